//! Field specification codec
//!
//! Translates between a path through the schema graph
//! (`CollectionObject -> determinations -> preferredTaxon -> fullName`) and
//! the compact string id persisted by saved queries, reports and export
//! mappings (`1,9-determinations,4-preferredtaxon.taxon.fullname`).
//!
//! ```text
//!   Table.field.field ──FieldSpec::from_path──┐
//!                                             ▼
//!   string id ─────────FieldSpec::decode──► FieldSpec ──encode──────────► string id
//!                                             └────────to_mapping_path──► ["determinations", "#1", ...]
//! ```
//!
//! All operations are pure functions of their inputs and a borrowed,
//! read-only [`fieldspec_schema::Catalog`]. `encode` and `decode` are inverses
//! up to case normalization.

pub mod date_part;
pub mod decode;
pub mod encode;
pub mod error;
pub mod field_spec;
pub mod mapping;

pub use date_part::{extract_date_part, DatePart};
pub use decode::SavedQueryField;
pub use encode::QueryFieldAttributes;
pub use error::CodecError;
pub use field_spec::{FieldSpec, Terminal};
pub use mapping::{format_tree_rank, is_tree_rank_token, TO_MANY_MARKER, TREE_RANK_PREFIX};
