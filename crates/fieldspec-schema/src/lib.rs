//! Schema catalog for fieldspec
//!
//! Holds the entity-relationship graph that field specifications walk:
//! - Tables -> stable name + numeric id
//! - Literal fields -> storage type (temporal or not)
//! - Relationships -> related table + cardinality
//!
//! The catalog is loaded from a datamodel JSON document and is immutable once
//! built. Callers pass it by reference to the codec.

pub mod catalog;
pub mod definition;

pub use catalog::{fold_name, Catalog, Field, FieldKind, SchemaCatalog, SchemaError, Table, TableRef};
pub use definition::{
    Cardinality, DatamodelDefinition, FieldDefinition, FieldType, RelationshipDefinition,
    RelationshipType, TableDefinition, TableId,
};
