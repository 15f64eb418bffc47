//! Table storage.
//!
//! The pipeline never owns persisted state; it reads and writes whole tables
//! through a [`TableStore`]. Two implementations are provided:
//!
//! - [`MemoryStore`] keeps everything in process, for tests and embedding
//! - [`ParquetStore`] keeps one Parquet file per table in a directory, with
//!   the imputables registry in `imputables.json`

mod memory;
mod parquet;

pub use memory::MemoryStore;
pub use parquet::ParquetStore;

use crate::error::{Result, StudyError};
use once_cell::sync::Lazy;
use polars::prelude::DataFrame;
use regex::Regex;

// Anything but path separators and NUL
static FILE_STEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^/\\\x00]+$").expect("Invalid regex: file stem"));

/// Reject table names that cannot be used as a file stem.
///
/// Only stores that map names to paths need this; table names themselves
/// come from column names and may hold spaces or punctuation.
pub fn validate_table_name(name: &str) -> Result<()> {
    if FILE_STEM.is_match(name) && name != "." && name != ".." {
        Ok(())
    } else {
        Err(StudyError::InvalidTableName(name.to_string()))
    }
}

/// Storage collaborator for whole tables and the imputables registry.
pub trait TableStore {
    /// Read a full table.
    fn read_table(&self, name: &str) -> Result<DataFrame>;

    /// Write a full table, replacing any table of the same name.
    fn write_table(&mut self, name: &str, table: &DataFrame) -> Result<()>;

    /// Whether a table of this name is stored.
    fn contains_table(&self, name: &str) -> bool;

    /// All stored table names, sorted.
    fn list_table_names(&self) -> Result<Vec<String>>;

    /// Append `name` to the imputables registry. Registering twice is a no-op.
    fn register_imputable(&mut self, name: &str) -> Result<()>;

    /// Registered imputable names in registration order.
    fn imputables(&self) -> Result<Vec<String>>;
}
