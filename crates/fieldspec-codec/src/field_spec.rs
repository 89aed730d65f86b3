//! Field specifications and the path resolver.
//!
//! A [`FieldSpec`] is the structured form of a query column: a base table, a
//! join path walked through the schema graph, and what the walk ends in.
//! Values are immutable; every transformation returns a new spec.

use fieldspec_schema::{Catalog, Field, TableRef};
use serde::Serialize;

use crate::date_part::{extract_date_part, DatePart};
use crate::error::CodecError;

/// What a field specification's join path terminates in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Terminal {
    /// The join path resolves fully (or is empty: the whole record).
    Resolved,
    /// The join path ends in a temporal field, read at this granularity.
    Date(DatePart),
    /// A hierarchy rank below the terminal table. Rank names are configured
    /// per discipline at runtime, so no schema field backs them.
    TreeRank(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    base_table: TableRef,
    join_path: Vec<Field>,
    table: TableRef,
    terminal: Terminal,
}

impl FieldSpec {
    /// Resolve a base table name and a list of field names into a spec.
    ///
    /// Every segment but the last must be a relationship. An empty segment
    /// list denotes the base table itself.
    pub fn from_path<C, S>(catalog: &C, base_table: &str, segments: &[S]) -> Result<Self, CodecError>
    where
        C: Catalog + ?Sized,
        S: AsRef<str>,
    {
        let base = catalog
            .table(base_table)
            .ok_or_else(|| CodecError::UnknownTable {
                name: base_table.to_string(),
            })?;

        let mut node = base;
        let mut join_path = Vec::with_capacity(segments.len());
        for (index, segment) in segments.iter().enumerate() {
            let segment = segment.as_ref();
            let field = node.field(segment).ok_or_else(|| CodecError::UnknownField {
                table: node.name.clone(),
                field: segment.to_string(),
            })?;
            join_path.push(field.clone());

            match field.related_table() {
                Some(related) => {
                    node = catalog
                        .table_by_id(related.id)
                        .ok_or(CodecError::UnknownTableId { id: related.id })?;
                }
                None if index + 1 != segments.len() => {
                    return Err(CodecError::NotARelationship {
                        table: node.name.clone(),
                        field: field.name.clone(),
                    });
                }
                None => {}
            }
        }

        let terminal = match join_path.last() {
            Some(field) if field.is_temporal() => Terminal::Date(DatePart::FullDate),
            _ => Terminal::Resolved,
        };

        Ok(Self {
            base_table: base.table_ref(),
            join_path,
            table: node.table_ref(),
            terminal,
        })
    }

    /// Resolve a human-authored `Table.field.field` path.
    ///
    /// Empty segments (`a..b`, a trailing `.`) resolve like any other name
    /// and fail with [`CodecError::UnknownField`].
    pub fn from_dotted_path<C>(catalog: &C, path: &str) -> Result<Self, CodecError>
    where
        C: Catalog + ?Sized,
    {
        let mut parts = path.split('.');
        let base = parts.next().unwrap_or_default();
        let segments: Vec<&str> = parts.collect();
        Self::from_path(catalog, base, &segments)
    }

    /// Assemble a spec from already-validated parts (decoder use only).
    pub(crate) fn from_parts(
        base_table: TableRef,
        join_path: Vec<Field>,
        table: TableRef,
        terminal: Terminal,
    ) -> Self {
        Self {
            base_table,
            join_path,
            table,
            terminal,
        }
    }

    /// Target another granularity of the terminal temporal field.
    pub fn with_date_part(&self, date_part: DatePart) -> Result<Self, CodecError> {
        match self.field() {
            Some(field) if field.is_temporal() && !self.has_tree_rank() => Ok(Self {
                terminal: Terminal::Date(date_part),
                ..self.clone()
            }),
            Some(field) => Err(CodecError::NotTemporal {
                table: field.owner.name.clone(),
                field: field.name.clone(),
            }),
            None => Err(CodecError::NotTemporal {
                table: self.table.name.clone(),
                field: String::new(),
            }),
        }
    }

    /// Point the field spec at a tree rank below its terminal table.
    ///
    /// The join path must be empty or end in a relationship. The rank must
    /// not collide with a real field of the terminal table, nor end in a
    /// date-part suffix: the encoded string would decode to something else.
    pub fn with_tree_rank<C>(&self, catalog: &C, rank: &str) -> Result<Self, CodecError>
    where
        C: Catalog + ?Sized,
    {
        let invalid = |reason: &str| CodecError::InvalidTreeRank {
            rank: rank.to_string(),
            reason: reason.to_string(),
        };

        if rank.is_empty() {
            return Err(invalid("rank name is empty"));
        }
        if rank.contains('.') {
            return Err(invalid("rank name contains `.`"));
        }
        if let (_, Some(part)) = extract_date_part(rank) {
            return Err(invalid(&format!("rank name ends in a date-part suffix ({part})")));
        }
        if self.field().is_some_and(|f| !f.is_relationship()) {
            return Err(invalid("join path ends in a plain field"));
        }
        let table = catalog
            .table_by_id(self.table.id)
            .ok_or(CodecError::UnknownTableId { id: self.table.id })?;
        if table.field(rank).is_some() {
            return Err(invalid(&format!("`{}` already has a field of that name", table.name)));
        }

        Ok(Self {
            terminal: Terminal::TreeRank(rank.to_string()),
            ..self.clone()
        })
    }

    pub fn base_table(&self) -> &TableRef {
        &self.base_table
    }

    pub fn join_path(&self) -> &[Field] {
        &self.join_path
    }

    /// The table the join path ends on.
    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// Last element of the join path.
    pub fn field(&self) -> Option<&Field> {
        self.join_path.last()
    }

    pub fn date_part(&self) -> Option<DatePart> {
        match self.terminal {
            Terminal::Date(part) => Some(part),
            Terminal::Resolved | Terminal::TreeRank(_) => None,
        }
    }

    pub fn tree_rank(&self) -> Option<&str> {
        match &self.terminal {
            Terminal::TreeRank(rank) => Some(rank),
            Terminal::Resolved | Terminal::Date(_) => None,
        }
    }

    fn has_tree_rank(&self) -> bool {
        matches!(self.terminal, Terminal::TreeRank(_))
    }

    /// True when the field spec references a related record rather than a value.
    pub fn is_relationship(&self) -> bool {
        !self.has_tree_rank() && self.field().is_some_and(Field::is_relationship)
    }
}

impl std::fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base_table.name)?;
        for field in &self.join_path {
            write!(f, ".{}", field.name)?;
        }
        match &self.terminal {
            Terminal::Resolved | Terminal::Date(DatePart::FullDate) => Ok(()),
            Terminal::Date(part) => write!(f, " ({part})"),
            Terminal::TreeRank(rank) => write!(f, ".{rank} (rank)"),
        }
    }
}
