//! Derived table naming.
//!
//! A purge/flag derivative is named by its edit history: one tag per edit
//! (`p-<col>`, `f-<col>`, `p-<pct>`, `f-<pct>`) joined by `_` in the order
//! applied. Imputed tables append the strategy to the source name.

use crate::types::{ImputationStrategy, StructuralEdit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag for a single edit.
pub fn edit_tag(edit: &StructuralEdit) -> String {
    match edit {
        StructuralEdit::PurgeColumn(column) => format!("p-{column}"),
        StructuralEdit::PurgeByNullRatio(threshold) => format!("p-{threshold}"),
        StructuralEdit::FlagColumn(column) => format!("f-{column}"),
        StructuralEdit::FlagByNullRatio(threshold) => format!("f-{threshold}"),
    }
}

/// Ordered edit tags accumulated during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    tags: Vec<String>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provenance with `edit` appended.
    pub fn with(mut self, edit: &StructuralEdit) -> Self {
        self.tags.push(edit_tag(edit));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The derived table name, or `None` when no edit was applied.
    pub fn name(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.tags.join("_"))
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.join("_"))
    }
}

/// Name for the result of imputing `source`, e.g. `p-x_mean-imputed_one-hot`.
pub fn imputed_table_name(source: &str, strategy: &ImputationStrategy, one_hot: bool) -> String {
    let mut name = format!("{source}_{}-imputed", strategy.label());
    if one_hot {
        name.push_str("_one-hot");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Threshold;

    #[test]
    fn test_purge_then_flag() {
        let provenance = Provenance::new()
            .with(&StructuralEdit::PurgeColumn("x".to_string()))
            .with(&StructuralEdit::FlagColumn("y".to_string()));

        assert_eq!(provenance.name().as_deref(), Some("p-x_f-y"));
    }

    #[test]
    fn test_ratio_tags() {
        let provenance = Provenance::new()
            .with(&StructuralEdit::PurgeByNullRatio(Threshold::new(60.0).unwrap()))
            .with(&StructuralEdit::FlagByNullRatio(Threshold::new(12.5).unwrap()));

        assert_eq!(provenance.tags(), &["p-60", "f-12.5"]);
        assert_eq!(provenance.to_string(), "p-60_f-12.5");
    }

    #[test]
    fn test_empty_provenance_has_no_name() {
        assert!(Provenance::new().name().is_none());
    }

    #[test]
    fn test_imputed_table_names() {
        assert_eq!(
            imputed_table_name("aggregate", &ImputationStrategy::Mean, false),
            "aggregate_mean-imputed"
        );
        assert_eq!(
            imputed_table_name("p-x", &ImputationStrategy::MostFrequent, true),
            "p-x_most-frequent-imputed_one-hot"
        );
        assert_eq!(
            imputed_table_name("aggregate", &ImputationStrategy::Knn { neighbors: 3 }, false),
            "aggregate_3-nearest-imputed"
        );
    }
}
