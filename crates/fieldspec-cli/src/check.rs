//! `fieldspec check`: audit the string ids stored in saved query fields.
//!
//! Each row is decoded against the catalog. Rows that fail are corrupt (the
//! saved query referencing them must be repaired by hand). Rows that decode
//! but re-encode to a different string or flag are valid yet non-canonical,
//! e.g. legacy camelCase field names, or an `isrelfld` that disagrees with
//! the terminal field.

use std::path::Path;

use anyhow::{Context, Result};
use fieldspec_codec::SavedQueryField;
use fieldspec_schema::Catalog;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub total: usize,
    pub ok: usize,
    pub non_canonical: Vec<NonCanonicalRow>,
    pub corrupt: Vec<CorruptRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NonCanonicalRow {
    pub index: usize,
    pub string_id: String,
    pub canonical: String,
    /// `isrelfld` the canonical string must be stored with.
    pub canonical_is_relationship: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorruptRow {
    pub index: usize,
    pub string_id: String,
    pub error: String,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.corrupt.is_empty()
    }
}

pub fn read_saved_fields(path: &Path) -> Result<Vec<SavedQueryField>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("`{}` is not a JSON array of saved query fields", path.display()))
}

pub fn check_fields<C>(catalog: &C, rows: &[SavedQueryField]) -> CheckReport
where
    C: Catalog + ?Sized,
{
    let mut report = CheckReport {
        total: rows.len(),
        ..CheckReport::default()
    };

    for (index, row) in rows.iter().enumerate() {
        match row.decode(catalog) {
            Ok(spec) => {
                let canonical = spec.encode();
                if canonical.string_id == row.string_id
                    && canonical.is_relationship == row.is_relationship
                {
                    report.ok += 1;
                } else {
                    tracing::info!(
                        index,
                        string_id = %row.string_id,
                        canonical = %canonical.string_id,
                        "non-canonical saved query field"
                    );
                    report.non_canonical.push(NonCanonicalRow {
                        index,
                        string_id: row.string_id.clone(),
                        canonical: canonical.string_id,
                        canonical_is_relationship: canonical.is_relationship,
                    });
                }
            }
            Err(err) => {
                tracing::warn!(
                    index,
                    string_id = %row.string_id,
                    error = %err,
                    "corrupt saved query field"
                );
                report.corrupt.push(CorruptRow {
                    index,
                    string_id: row.string_id.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldspec_schema::SchemaCatalog;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_json_str(
            r#"{ "tables": [
                { "name": "Agent", "tableId": 5,
                  "fields": [ { "name": "lastName", "type": "java.lang.String" } ],
                  "relationships": [ { "name": "createdByAgent", "type": "many-to-one", "relatedModelName": "Agent" } ] }
            ] }"#,
        )
        .expect("catalog")
    }

    fn row(string_id: &str, is_relationship: bool) -> SavedQueryField {
        SavedQueryField {
            string_id: string_id.to_string(),
            is_relationship,
        }
    }

    #[test]
    fn sorts_rows_into_ok_non_canonical_and_corrupt() {
        let rows = vec![
            row("5.agent.lastname", false),
            row("5.agent.lastName", false),
            row("5,5-createdbyagent.agent.createdbyagent", true),
            row("5,9.agent.lastname", false),
            row("not a string id", false),
        ];

        let report = check_fields(&catalog(), &rows);
        assert_eq!(report.total, 5);
        assert_eq!(report.ok, 2);
        assert_eq!(report.non_canonical.len(), 1);
        assert_eq!(report.non_canonical[0].canonical, "5.agent.lastname");
        assert_eq!(
            report.corrupt.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn tree_ranks_are_not_corrupt() {
        let report = check_fields(&catalog(), &[row("5.agent.Genus", false)]);
        assert!(report.is_clean());
        assert_eq!(report.ok, 1);
    }

    #[test]
    fn mismatched_relationship_flags_are_non_canonical() {
        let rows = vec![
            row("5.agent.createdbyagent", false),
            row("5,5.agent.lastname", true),
            row("5,5-createdbyagent.agent.", false),
        ];

        let report = check_fields(&catalog(), &rows);
        assert!(report.is_clean());
        assert_eq!(report.ok, 0);
        let canonical: Vec<_> = report
            .non_canonical
            .iter()
            .map(|r| (r.canonical.as_str(), r.canonical_is_relationship))
            .collect();
        assert_eq!(
            canonical,
            vec![
                ("5,5-createdbyagent.agent.createdbyagent", true),
                ("5.agent.lastname", false),
                ("5,5-createdbyagent.agent.createdbyagent", true),
            ]
        );
    }
}
