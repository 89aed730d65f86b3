//! String encoder: [`FieldSpec`] -> canonical string id.
//!
//! Canonical form: `tableList.tablename.fieldname[DatePartSuffix]`, where the
//! table list is the base table id followed by one descriptor per hop. A hop
//! whose relationship is named after its target table is just that table's
//! id; any other hop is `id-relationshipname`.
//!
//! This text is persisted by saved queries, reports and export mappings. Its
//! byte layout must not change.

use fieldspec_schema::{fold_name, Field};
use serde::{Deserialize, Serialize};

use crate::field_spec::{FieldSpec, Terminal};

/// Encoder output, in the attribute names of a saved query field record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFieldAttributes {
    #[serde(rename = "tablelist")]
    pub table_list: String,
    #[serde(rename = "stringid")]
    pub string_id: String,
    #[serde(rename = "fieldname")]
    pub field_name: String,
    #[serde(rename = "isrelfld")]
    pub is_relationship: bool,
}

impl FieldSpec {
    pub fn encode(&self) -> QueryFieldAttributes {
        let is_relationship = self.is_relationship();
        let table_list = self.table_list();
        let field_name = self.encoded_field_name();
        let string_id = format!(
            "{table_list}.{}.{field_name}",
            fold_name(&self.table().name)
        );
        QueryFieldAttributes {
            table_list,
            string_id,
            field_name,
            is_relationship,
        }
    }

    /// Join-path elements that move to another table.
    ///
    /// A terminal plain field is not a hop; a terminal relationship is, and
    /// so is every relationship in front of a tree rank.
    fn hops(&self) -> &[Field] {
        let path = self.join_path();
        match (self.terminal(), path.last()) {
            (Terminal::TreeRank(_), _) => path,
            (_, Some(last)) if !last.is_relationship() => &path[..path.len() - 1],
            _ => path,
        }
    }

    fn table_list(&self) -> String {
        let mut list = self.base_table().id.to_string();
        for hop in self.hops() {
            list.push(',');
            list.push_str(&hop_descriptor(hop));
        }
        list
    }

    fn encoded_field_name(&self) -> String {
        let mut name = match (self.tree_rank(), self.field()) {
            (Some(rank), _) => rank.to_string(),
            (None, Some(field)) => fold_name(&field.name),
            (None, None) => String::new(),
        };
        if let Some(suffix) = self.date_part().and_then(|part| part.suffix()) {
            name.push_str(suffix);
        }
        name
    }
}

fn hop_descriptor(hop: &Field) -> String {
    match hop.related_table() {
        Some(related) if fold_name(&related.name) == fold_name(&hop.name) => related.id.to_string(),
        Some(related) => format!("{}-{}", related.id, fold_name(&hop.name)),
        // Hops are relationships by construction.
        None => fold_name(&hop.name),
    }
}
