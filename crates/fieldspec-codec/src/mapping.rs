//! Mapping path projection.
//!
//! Mapping UIs address a column as a flat list of lowercase tokens: one per
//! join-path element, a `#1` marker after each to-many relationship (the first
//! record of the collection), and a trailing `$Rank` token for tree ranks.

use fieldspec_schema::fold_name;

use crate::field_spec::FieldSpec;

/// Token placed after a to-many relationship.
pub const TO_MANY_MARKER: &str = "#1";

/// Prefix marking a tree-rank token.
pub const TREE_RANK_PREFIX: char = '$';

pub fn format_tree_rank(rank: &str) -> String {
    format!("{TREE_RANK_PREFIX}{rank}")
}

pub fn is_tree_rank_token(token: &str) -> bool {
    token.starts_with(TREE_RANK_PREFIX)
}

impl FieldSpec {
    pub fn to_mapping_path(&self) -> Vec<String> {
        let mut path = Vec::with_capacity(self.join_path().len() + 1);
        for field in self.join_path() {
            path.push(fold_name(&field.name));
            if field.is_to_many() {
                path.push(TO_MANY_MARKER.to_string());
            }
        }
        if let Some(rank) = self.tree_rank() {
            path.push(format_tree_rank(rank));
        }
        path.retain(|token| !token.is_empty());
        path
    }
}
