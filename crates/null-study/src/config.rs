//! Configuration types for the null study pipeline.
//!
//! This module provides configuration options using the builder pattern.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do with the imputed one-hot indicator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OneHotMerge {
    /// Compute the indicator imputation but emit the original categorical
    /// columns unchanged.
    #[default]
    Discard,
    /// Emit the imputed indicator columns in place of the categorical block.
    Replace,
}

/// Policy applied when a derived table name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DuplicatePolicy {
    /// Overwrite the stored table; the registry keeps a single entry.
    #[default]
    Replace,
    /// Fail with [`StudyError::TableExists`](crate::StudyError::TableExists).
    Reject,
    /// Append `-v2`, `-v3`, ... until the name is free.
    Version,
}

/// Configuration for a null study.
///
/// Use [`StudyConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use null_study::config::{StudyConfig, OneHotMerge};
///
/// let config = StudyConfig::builder()
///     .root_table("aggregate")
///     .one_hot_merge(OneHotMerge::Replace)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Columns routed around imputation untouched, emitted first.
    /// Default: ["station", "date"]
    pub identifier_columns: Vec<String>,

    /// Name of the root table, which is always imputable.
    /// Default: "aggregate"
    pub root_table: String,

    /// Bookkeeping tables hidden from table listings.
    /// Default: agg_blackhole, expeditions, sensors, imputables
    pub hidden_tables: Vec<String>,

    /// Handling of the one-hot indicator imputation result.
    /// Default: Discard
    pub one_hot_merge: OneHotMerge,

    /// Handling of duplicate derived table names.
    /// Default: Replace
    pub duplicate_policy: DuplicatePolicy,

    /// Number of neighbors for KNN imputation when none is given.
    /// Default: 5
    pub knn_neighbors: usize,

    /// Directory for CSV exports.
    /// Default: "csv_output"
    pub export_dir: PathBuf,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            identifier_columns: default_identifiers(),
            root_table: "aggregate".to_string(),
            hidden_tables: default_hidden_tables(),
            one_hot_merge: OneHotMerge::default(),
            duplicate_policy: DuplicatePolicy::default(),
            knn_neighbors: 5,
            export_dir: PathBuf::from("csv_output"),
        }
    }
}

fn default_identifiers() -> Vec<String> {
    vec!["station".to_string(), "date".to_string()]
}

fn default_hidden_tables() -> Vec<String> {
    ["agg_blackhole", "expeditions", "sensors", "imputables"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl StudyConfig {
    /// Create a new configuration builder.
    pub fn builder() -> StudyConfigBuilder {
        StudyConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.root_table.trim().is_empty() {
            return Err(ConfigValidationError::EmptyRootTable);
        }

        if self.knn_neighbors == 0 {
            return Err(ConfigValidationError::InvalidKnnNeighbors(
                self.knn_neighbors,
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for id in &self.identifier_columns {
            if !seen.insert(id.as_str()) {
                return Err(ConfigValidationError::DuplicateIdentifier(id.clone()));
            }
        }

        Ok(())
    }

    /// Whether `name` is one of the identifier columns.
    pub fn is_identifier(&self, name: &str) -> bool {
        self.identifier_columns.iter().any(|id| id == name)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Root table name must not be empty")]
    EmptyRootTable,

    #[error("Invalid KNN neighbors: {0} (must be at least 1)")]
    InvalidKnnNeighbors(usize),

    #[error("Identifier column '{0}' listed more than once")]
    DuplicateIdentifier(String),
}

impl From<ConfigValidationError> for crate::StudyError {
    fn from(err: ConfigValidationError) -> Self {
        crate::StudyError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`StudyConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct StudyConfigBuilder {
    identifier_columns: Option<Vec<String>>,
    root_table: Option<String>,
    hidden_tables: Option<Vec<String>>,
    one_hot_merge: Option<OneHotMerge>,
    duplicate_policy: Option<DuplicatePolicy>,
    knn_neighbors: Option<usize>,
    export_dir: Option<PathBuf>,
}

impl StudyConfigBuilder {
    /// Set the identifier columns that imputation must leave untouched.
    pub fn identifier_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the root table name.
    pub fn root_table(mut self, name: impl Into<String>) -> Self {
        self.root_table = Some(name.into());
        self
    }

    /// Set the tables hidden from listings.
    pub fn hidden_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_tables = Some(tables.into_iter().map(Into::into).collect());
        self
    }

    /// Choose what happens to the imputed one-hot indicator table.
    pub fn one_hot_merge(mut self, merge: OneHotMerge) -> Self {
        self.one_hot_merge = Some(merge);
        self
    }

    /// Choose how duplicate derived table names are handled.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = Some(policy);
        self
    }

    /// Set the default number of neighbors for KNN imputation.
    pub fn knn_neighbors(mut self, k: usize) -> Self {
        self.knn_neighbors = Some(k);
        self
    }

    /// Set the CSV export directory.
    pub fn export_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `StudyConfig` or an error if validation fails.
    pub fn build(self) -> Result<StudyConfig, ConfigValidationError> {
        let config = StudyConfig {
            identifier_columns: self.identifier_columns.unwrap_or_else(default_identifiers),
            root_table: self.root_table.unwrap_or_else(|| "aggregate".to_string()),
            hidden_tables: self.hidden_tables.unwrap_or_else(default_hidden_tables),
            one_hot_merge: self.one_hot_merge.unwrap_or_default(),
            duplicate_policy: self.duplicate_policy.unwrap_or_default(),
            knn_neighbors: self.knn_neighbors.unwrap_or(5),
            export_dir: self
                .export_dir
                .unwrap_or_else(|| PathBuf::from("csv_output")),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudyConfig::default();
        assert_eq!(config.identifier_columns, vec!["station", "date"]);
        assert_eq!(config.root_table, "aggregate");
        assert_eq!(config.one_hot_merge, OneHotMerge::Discard);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
        assert_eq!(config.knn_neighbors, 5);
        assert!(config.hidden_tables.contains(&"imputables".to_string()));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = StudyConfig::builder()
            .identifier_columns(["site"])
            .root_table("readings")
            .one_hot_merge(OneHotMerge::Replace)
            .duplicate_policy(DuplicatePolicy::Version)
            .knn_neighbors(3)
            .build()
            .unwrap();

        assert_eq!(config.identifier_columns, vec!["site"]);
        assert_eq!(config.root_table, "readings");
        assert_eq!(config.one_hot_merge, OneHotMerge::Replace);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Version);
        assert_eq!(config.knn_neighbors, 3);
        assert!(config.is_identifier("site"));
        assert!(!config.is_identifier("station"));
    }

    #[test]
    fn test_validation_invalid_knn_neighbors() {
        let result = StudyConfig::builder().knn_neighbors(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidKnnNeighbors(0)
        ));
    }

    #[test]
    fn test_validation_empty_root() {
        let result = StudyConfig::builder().root_table("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyRootTable
        ));
    }

    #[test]
    fn test_validation_duplicate_identifier() {
        let result = StudyConfig::builder()
            .identifier_columns(["station", "station"])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::DuplicateIdentifier(_)
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "identifier_columns": ["station", "date"],
            "root_table": "aggregate",
            "hidden_tables": [],
            "one_hot_merge": "Replace",
            "duplicate_policy": "Reject",
            "knn_neighbors": 7,
            "export_dir": "exports"
        }"#;

        let config: StudyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.one_hot_merge, OneHotMerge::Replace);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.knn_neighbors, 7);
        assert!(config.hidden_tables.is_empty());
        assert_eq!(config.export_dir.to_str().unwrap(), "exports");
    }
}
