//! Error types for the null study pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Input
//! validation failures are raised immediately to the caller; computational
//! degeneracies (all-null columns, too few neighbors) are not errors and are
//! reported as [`ImputationWarning`](crate::types::ImputationWarning)s instead.
//!
//! Errors are serializable so a front end can render them as `{code, message}`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the null study pipeline.
#[derive(Error, Debug)]
pub enum StudyError {
    /// Threshold percentage outside `[0, 100]` or not a number.
    #[error("Invalid threshold '{0}': expected a percentage between 0 and 100")]
    InvalidThreshold(String),

    /// Neighbor count for KNN imputation must be positive.
    #[error("Invalid neighbor count {0}: k must be at least 1")]
    InvalidNeighbors(i64),

    /// Table name cannot be used as a storage key.
    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),

    /// A structural edit could not be parsed.
    #[error("Invalid edit '{0}': expected purge:COL, purge-per:PCT, flag:COL or flag-per:PCT")]
    InvalidEdit(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Table was not found in the store.
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// Imputation was requested on a table that is not registered as imputable.
    #[error("Table '{0}' is not imputable")]
    NotImputable(String),

    /// A derived table with this name already exists and the policy rejects duplicates.
    #[error("Table '{0}' already exists")]
    TableExists(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<StudyError>,
    },
}

impl StudyError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        StudyError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for front-end handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidThreshold(_) => "INVALID_THRESHOLD",
            Self::InvalidNeighbors(_) => "INVALID_NEIGHBORS",
            Self::InvalidTableName(_) => "INVALID_TABLE_NAME",
            Self::InvalidEdit(_) => "INVALID_EDIT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::TableNotFound(_) => "TABLE_NOT_FOUND",
            Self::NotImputable(_) => "NOT_IMPUTABLE",
            Self::TableExists(_) => "TABLE_EXISTS",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is an input validation failure.
    ///
    /// Validation errors are the caller's to handle, typically by asking the
    /// user for a different value.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::InvalidThreshold(_)
            | Self::InvalidNeighbors(_)
            | Self::InvalidTableName(_)
            | Self::InvalidEdit(_) => true,
            Self::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for StudyError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("StudyError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for null study operations.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| StudyError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| StudyError::Io(e).with_context(context))
    }
}
