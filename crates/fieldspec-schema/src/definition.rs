//! Datamodel definition (the on-disk JSON shape).
//!
//! These types are the untrusted input to [`crate::SchemaCatalog`]: nothing
//! here is cross-checked until the catalog is built.

use serde::{Deserialize, Serialize};

/// Stable numeric table identifier (as persisted in saved queries).
pub type TableId = u32;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatamodelDefinition {
    pub tables: Vec<TableDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    pub name: String,
    pub table_id: TableId,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default)]
    pub indexed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub related_model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_side_name: Option<String>,
    #[serde(default)]
    pub dependent: bool,
}

/// Storage type of a literal field, named after the Java type of the
/// underlying ORM column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FieldType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "java.lang.String")]
    String,
    #[serde(rename = "java.lang.Byte")]
    Byte,
    #[serde(rename = "java.lang.Short")]
    Short,
    #[serde(rename = "java.lang.Integer")]
    Integer,
    #[serde(rename = "java.lang.Float")]
    Float,
    #[serde(rename = "java.lang.Double")]
    Double,
    #[serde(rename = "java.lang.Long")]
    Long,
    #[serde(rename = "java.math.BigDecimal")]
    BigDecimal,
    #[serde(rename = "java.lang.Boolean")]
    Boolean,
    #[serde(rename = "java.sql.Timestamp")]
    Timestamp,
    #[serde(rename = "java.util.Calendar")]
    Calendar,
    #[serde(rename = "java.util.Date")]
    Date,
}

impl FieldType {
    /// True for the types a query can split into year/month/day parts.
    pub fn is_temporal(self) -> bool {
        matches!(self, FieldType::Date | FieldType::Calendar | FieldType::Timestamp)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    #[serde(rename = "one-to-one")]
    OneToOne,
    #[serde(rename = "one-to-many")]
    OneToMany,
    #[serde(rename = "many-to-one")]
    ManyToOne,
    #[serde(rename = "many-to-many")]
    ManyToMany,
    #[serde(rename = "zero-to-one")]
    ZeroToOne,
}

impl RelationshipType {
    pub fn cardinality(self) -> Cardinality {
        match self {
            RelationshipType::OneToMany | RelationshipType::ManyToMany => Cardinality::ToMany,
            RelationshipType::OneToOne
            | RelationshipType::ManyToOne
            | RelationshipType::ZeroToOne => Cardinality::ToOne,
        }
    }
}

/// How many related records a relationship can reach from one record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    ToOne,
    ToMany,
}
