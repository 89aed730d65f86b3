//! Validated, immutable schema catalog.
//!
//! A [`SchemaCatalog`] is built once from a [`DatamodelDefinition`] and never
//! mutated afterwards. Every relationship already carries a resolved
//! [`TableRef`] for its target, so consumers can walk the graph without going
//! back to the catalog for each hop.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::definition::*;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate table name `{name}`")]
    DuplicateTableName { name: String },
    #[error("duplicate table id {id} (`{first}` and `{second}`)")]
    DuplicateTableId {
        id: TableId,
        first: String,
        second: String,
    },
    #[error("table `{table}`: duplicate field name `{field}`")]
    DuplicateFieldName { table: String, field: String },
    #[error("table `{table}`: relationship `{relationship}` targets unknown table `{related}`")]
    UnknownRelatedTable {
        table: String,
        relationship: String,
        related: String,
    },
    #[error("invalid datamodel JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read datamodel `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Case folding shared by every name lookup and by the string-id encoder.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Cheap owned handle to a table: enough to print or persist a reference
/// without borrowing the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableRef {
    pub id: TableId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Literal {
        field_type: FieldType,
    },
    Relationship {
        relationship_type: RelationshipType,
        related: TableRef,
        #[serde(skip_serializing_if = "Option::is_none")]
        other_side_name: Option<String>,
        dependent: bool,
    },
}

/// A field or relationship of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub owner: TableRef,
    pub kind: FieldKind,
}

impl Field {
    pub fn is_relationship(&self) -> bool {
        matches!(self.kind, FieldKind::Relationship { .. })
    }

    /// Relationships are never temporal, whatever their target.
    pub fn is_temporal(&self) -> bool {
        match &self.kind {
            FieldKind::Literal { field_type } => field_type.is_temporal(),
            FieldKind::Relationship { .. } => false,
        }
    }

    pub fn related_table(&self) -> Option<&TableRef> {
        match &self.kind {
            FieldKind::Relationship { related, .. } => Some(related),
            FieldKind::Literal { .. } => None,
        }
    }

    pub fn cardinality(&self) -> Option<Cardinality> {
        match &self.kind {
            FieldKind::Relationship {
                relationship_type, ..
            } => Some(relationship_type.cardinality()),
            FieldKind::Literal { .. } => None,
        }
    }

    pub fn is_to_many(&self) -> bool {
        self.cardinality() == Some(Cardinality::ToMany)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub id: TableId,
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
}

impl Table {
    pub fn table_ref(&self) -> TableRef {
        TableRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Case-insensitive lookup over literal fields and relationships alike.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.by_name
            .get(&fold_name(name))
            .map(|&index| &self.fields[index])
    }

    /// Fields in declaration order (literal fields first, then relationships).
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_relationship())
    }

    pub fn literal_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_relationship())
    }
}

/// Read-only table lookup, the only view of the schema the codec needs.
pub trait Catalog {
    /// Case-insensitive lookup by table name.
    fn table(&self, name: &str) -> Option<&Table>;

    fn table_by_id(&self, id: TableId) -> Option<&Table>;
}

#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    tables: Vec<Table>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<TableId, usize>,
}

impl SchemaCatalog {
    pub fn from_definition(definition: &DatamodelDefinition) -> Result<Self, SchemaError> {
        let mut by_name = HashMap::new();
        let mut by_id: HashMap<TableId, usize> = HashMap::new();

        for (index, table) in definition.tables.iter().enumerate() {
            if by_name
                .insert(fold_name(&table.name), index)
                .is_some()
            {
                return Err(SchemaError::DuplicateTableName {
                    name: table.name.clone(),
                });
            }
            if let Some(previous) = by_id.insert(table.table_id, index) {
                return Err(SchemaError::DuplicateTableId {
                    id: table.table_id,
                    first: definition.tables[previous].name.clone(),
                    second: table.name.clone(),
                });
            }
        }

        let tables = definition
            .tables
            .iter()
            .map(|table| build_table(table, definition, &by_name))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(tables = tables.len(), "loaded schema catalog");

        Ok(Self {
            tables,
            by_name,
            by_id,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let definition: DatamodelDefinition = serde_json::from_str(text)?;
        Self::from_definition(&definition)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

impl Catalog for SchemaCatalog {
    fn table(&self, name: &str) -> Option<&Table> {
        self.by_name
            .get(&fold_name(name))
            .map(|&index| &self.tables[index])
    }

    fn table_by_id(&self, id: TableId) -> Option<&Table> {
        self.by_id.get(&id).map(|&index| &self.tables[index])
    }
}

fn build_table(
    table: &TableDefinition,
    definition: &DatamodelDefinition,
    table_index: &HashMap<String, usize>,
) -> Result<Table, SchemaError> {
    let owner = TableRef {
        id: table.table_id,
        name: table.name.clone(),
    };

    let mut fields = Vec::with_capacity(table.fields.len() + table.relationships.len());
    for field in &table.fields {
        fields.push(Field {
            name: field.name.clone(),
            owner: owner.clone(),
            kind: FieldKind::Literal {
                field_type: field.field_type,
            },
        });
    }
    for relationship in &table.relationships {
        let related = table_index
            .get(&fold_name(&relationship.related_model_name))
            .map(|&index| &definition.tables[index])
            .ok_or_else(|| SchemaError::UnknownRelatedTable {
                table: table.name.clone(),
                relationship: relationship.name.clone(),
                related: relationship.related_model_name.clone(),
            })?;
        fields.push(Field {
            name: relationship.name.clone(),
            owner: owner.clone(),
            kind: FieldKind::Relationship {
                relationship_type: relationship.relationship_type,
                related: TableRef {
                    id: related.table_id,
                    name: related.name.clone(),
                },
                other_side_name: relationship.other_side_name.clone(),
                dependent: relationship.dependent,
            },
        });
    }

    let mut by_name = HashMap::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        if by_name
            .insert(fold_name(&field.name), index)
            .is_some()
        {
            return Err(SchemaError::DuplicateFieldName {
                table: table.name.clone(),
                field: field.name.clone(),
            });
        }
    }

    Ok(Table {
        name: table.name.clone(),
        id: table.table_id,
        fields,
        by_name,
    })
}
