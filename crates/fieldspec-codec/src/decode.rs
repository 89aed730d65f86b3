//! String decoder: canonical string id -> [`FieldSpec`].

use std::sync::LazyLock;

use fieldspec_schema::{fold_name, Catalog, Field, Table, TableId};
use regex::Regex;
use serde::Deserialize;

use crate::date_part::{extract_date_part, DatePart};
use crate::error::CodecError;
use crate::field_spec::{FieldSpec, Terminal};

static STRING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.]*)\.([^.]*)\.(.*)$").expect("string id regex"));

/// A stored query column as read back from a saved query or report.
///
/// Only the attributes needed to rebuild the field spec are kept; `tablelist` and
/// `fieldname` are derivable from `stringid`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedQueryField {
    #[serde(rename = "stringid")]
    pub string_id: String,
    #[serde(rename = "isrelfld", default)]
    pub is_relationship: bool,
}

impl SavedQueryField {
    pub fn decode<C>(&self, catalog: &C) -> Result<FieldSpec, CodecError>
    where
        C: Catalog + ?Sized,
    {
        FieldSpec::decode(catalog, &self.string_id, self.is_relationship)
    }
}

impl FieldSpec {
    /// Rebuild a spec from its canonical string id.
    ///
    /// `is_relationship` must be the flag stored next to the string: for a
    /// relationship column the last table-list entry is the relationship's
    /// target, so it is not walked as a hop.
    pub fn decode<C>(catalog: &C, string_id: &str, is_relationship: bool) -> Result<Self, CodecError>
    where
        C: Catalog + ?Sized,
    {
        let caps = STRING_ID
            .captures(string_id)
            .ok_or_else(|| CodecError::malformed(string_id, "expected `tableList.tableName.fieldName`"))?;
        let (Some(table_list), Some(table_name), Some(raw_field_name)) =
            (caps.get(1), caps.get(2), caps.get(3))
        else {
            return Err(CodecError::malformed(string_id, "expected `tableList.tableName.fieldName`"));
        };
        let (table_list, table_name, raw_field_name) =
            (table_list.as_str(), table_name.as_str(), raw_field_name.as_str());

        let mut elements: Vec<&str> = table_list.split(',').collect();
        let relationship_target = if is_relationship {
            if elements.len() < 2 {
                return Err(CodecError::malformed(
                    string_id,
                    "relationship column needs its target table in the table list",
                ));
            }
            let last = elements.pop().unwrap_or_default();
            Some(parse_table_id(string_id, hop_table_id(last))?)
        } else {
            None
        };

        let (base_element, hops) = elements
            .split_first()
            .ok_or_else(|| CodecError::malformed(string_id, "empty table list"))?;
        let base_id = parse_table_id(string_id, base_element)?;
        let base = catalog
            .table_by_id(base_id)
            .ok_or(CodecError::UnknownTableId { id: base_id })?;

        let mut node = base;
        let mut join_path = Vec::with_capacity(hops.len() + 1);
        for hop in hops {
            let (id_text, explicit_name) = match hop.split_once('-') {
                Some((id, name)) => (id, Some(name)),
                None => (*hop, None),
            };
            let id = parse_table_id(string_id, id_text)?;
            let target = catalog
                .table_by_id(id)
                .ok_or(CodecError::UnknownTableId { id })?;
            // A bare id means the relationship is named after its target.
            let field_name = explicit_name.unwrap_or(target.name.as_str());
            let field = node
                .field(field_name)
                .ok_or_else(|| CodecError::broken(&node.name, hop, format!("no field `{field_name}`")))?;
            match field.related_table() {
                Some(related) if related.id == id => {}
                Some(related) => {
                    return Err(CodecError::broken(
                        &node.name,
                        hop,
                        format!("`{}` leads to table {}, not {id}", field.name, related.id),
                    ));
                }
                None => {
                    return Err(CodecError::broken(
                        &node.name,
                        hop,
                        format!("`{}` is not a relationship", field.name),
                    ));
                }
            }
            join_path.push(field.clone());
            node = target;
        }

        let spec = decode_terminal(
            catalog,
            string_id,
            base,
            node,
            join_path,
            raw_field_name,
            relationship_target,
        )?;

        if fold_name(&spec.table().name) != fold_name(table_name) {
            tracing::warn!(
                string_id,
                expected = %spec.table().name,
                found = table_name,
                "string id table segment does not match decoded join path"
            );
        }
        Ok(spec)
    }
}

/// Resolve the terminal name on the last table of the walk.
///
/// A resolved name is appended to the join path whatever the stored flag
/// says; an unresolved one is a tree rank. Rows whose flag disagrees with
/// the terminal still decode, and re-encode to their canonical form.
fn decode_terminal<C>(
    catalog: &C,
    string_id: &str,
    base: &Table,
    node: &Table,
    mut join_path: Vec<Field>,
    raw_field_name: &str,
    listed_target: Option<TableId>,
) -> Result<FieldSpec, CodecError>
where
    C: Catalog + ?Sized,
{
    // Empty field name: the record the walk ends on.
    if raw_field_name.is_empty() {
        return Ok(FieldSpec::from_parts(
            base.table_ref(),
            join_path,
            node.table_ref(),
            Terminal::Resolved,
        ));
    }

    let (field_name, date_part) = extract_date_part(raw_field_name);
    let Some(field) = node.field(field_name) else {
        // Rank names are not validated against the discipline's configured
        // tree definition: a misspelled field decodes as a rank too.
        tracing::debug!(
            string_id,
            table = %node.name,
            rank = field_name,
            "terminal name is not a field; decoding as tree rank"
        );
        return Ok(FieldSpec::from_parts(
            base.table_ref(),
            join_path,
            node.table_ref(),
            Terminal::TreeRank(field_name.to_string()),
        ));
    };

    if let Some(related) = field.related_table() {
        match listed_target {
            Some(listed) if listed != related.id => tracing::warn!(
                string_id,
                relationship = %field.name,
                listed,
                actual = related.id,
                "relationship target id in table list does not match schema"
            ),
            Some(_) => {}
            None => tracing::info!(
                string_id,
                relationship = %field.name,
                "relationship terminal in a column not flagged as one"
            ),
        }
        let table = catalog
            .table_by_id(related.id)
            .ok_or(CodecError::UnknownTableId { id: related.id })?
            .table_ref();
        join_path.push(field.clone());
        return Ok(FieldSpec::from_parts(
            base.table_ref(),
            join_path,
            table,
            Terminal::Resolved,
        ));
    }

    if listed_target.is_some() {
        tracing::info!(
            string_id,
            field = %field.name,
            "plain field in a column flagged as a relationship"
        );
    }
    let terminal = if field.is_temporal() {
        Terminal::Date(date_part.unwrap_or(DatePart::FullDate))
    } else {
        if let Some(part) = date_part {
            tracing::warn!(
                string_id,
                field = %field.name,
                %part,
                "date part suffix on a non-temporal field ignored"
            );
        }
        Terminal::Resolved
    };
    join_path.push(field.clone());
    Ok(FieldSpec::from_parts(
        base.table_ref(),
        join_path,
        node.table_ref(),
        terminal,
    ))
}

/// Table id part of a hop descriptor (`4` or `4-preferredtaxon`).
fn hop_table_id(element: &str) -> &str {
    element.split_once('-').map_or(element, |(id, _)| id)
}

fn parse_table_id(string_id: &str, text: &str) -> Result<TableId, CodecError> {
    let not_an_id = || CodecError::malformed(string_id, format!("`{text}` is not a table id"));
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_an_id());
    }
    text.parse::<TableId>().map_err(|_| not_an_id())
}
