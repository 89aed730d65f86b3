use fieldspec_schema::TableId;
use thiserror::Error;

/// Codec failures. All of them are deterministic input-validation errors:
/// a caller holding a saved query that fails to decode should treat the
/// query as corrupt rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unknown table `{name}`")]
    UnknownTable { name: String },

    #[error("unknown table id {id}")]
    UnknownTableId { id: TableId },

    #[error("unknown field `{field}` on table `{table}`")]
    UnknownField { table: String, field: String },

    #[error("`{table}.{field}` is not a relationship but is followed by more path segments")]
    NotARelationship { table: String, field: String },

    #[error("broken join path at `{hop}` from table `{table}`: {reason}")]
    BrokenJoinPath {
        table: String,
        hop: String,
        reason: String,
    },

    #[error("malformed string id `{string_id}`: {reason}")]
    MalformedStringId { string_id: String, reason: String },

    #[error("`{table}.{field}` is not a temporal field")]
    NotTemporal { table: String, field: String },

    #[error("invalid tree rank `{rank}`: {reason}")]
    InvalidTreeRank { rank: String, reason: String },
}

impl CodecError {
    pub(crate) fn malformed(string_id: &str, reason: impl Into<String>) -> Self {
        CodecError::MalformedStringId {
            string_id: string_id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn broken(table: &str, hop: &str, reason: impl Into<String>) -> Self {
        CodecError::BrokenJoinPath {
            table: table.to_string(),
            hop: hop.to_string(),
            reason: reason.into(),
        }
    }
}
