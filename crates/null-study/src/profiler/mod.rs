//! Table profiling.
//!
//! - Column kind inference (categorical vs. numeric)
//! - Per-column null statistics

mod statistics;
mod type_inference;

pub use statistics::{analyze_nulls, columns_above_null_ratio};
pub use type_inference::{column_kind, partition_columns};
