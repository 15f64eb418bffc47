//! Column kind inference.
//!
//! A column is categorical as soon as it holds a single text value. Polars
//! stores a column under one dtype, so a sensor column with one stray text
//! reading is loaded as `String` and the whole column is categorical. A text
//! column with no non-null value holds no text and counts as numeric.

use crate::types::{ColumnKind, ColumnPartition};
use crate::utils::is_text_dtype;
use polars::prelude::*;

/// Classify one column from its current values.
pub fn column_kind(series: &Series) -> ColumnKind {
    if is_text_dtype(series.dtype()) && series.null_count() < series.len() {
        ColumnKind::Categorical
    } else {
        ColumnKind::Numeric
    }
}

/// Split the table's columns into categorical and numeric names, keeping
/// table order within each list.
pub fn partition_columns(df: &DataFrame) -> ColumnPartition {
    let mut partition = ColumnPartition::default();

    for column in df.get_columns() {
        let name = column.name().to_string();
        match column_kind(column.as_materialized_series()) {
            ColumnKind::Categorical => partition.categorical.push(name),
            ColumnKind::Numeric => partition.numeric.push(name),
        }
    }

    partition
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_preserves_order() {
        let df = df![
            "temp" => [1.0, 2.0],
            "sky" => ["clear", "rain"],
            "wind" => [3i64, 4],
            "sensor_state" => ["ok", "fault"],
        ]
        .unwrap();

        let partition = partition_columns(&df);
        assert_eq!(partition.categorical, vec!["sky", "sensor_state"]);
        assert_eq!(partition.numeric, vec!["temp", "wind"]);
    }

    #[test]
    fn test_single_stray_text_makes_column_categorical() {
        let df = df![
            "pressure" => [Some("1012.1"), Some("1013.4"), Some("ERR"), None],
        ]
        .unwrap();

        assert_eq!(partition_columns(&df).categorical, vec!["pressure"]);
    }

    #[test]
    fn test_all_null_text_column_is_numeric() {
        let df = df![
            "notes" => [Option::<&str>::None, None],
        ]
        .unwrap();

        let partition = partition_columns(&df);
        assert!(partition.categorical.is_empty());
        assert_eq!(partition.numeric, vec!["notes"]);
    }

    #[test]
    fn test_boolean_column_is_numeric() {
        let df = df!["has_temp" => [true, false]].unwrap();
        assert_eq!(
            column_kind(df.column("has_temp").unwrap().as_materialized_series()),
            ColumnKind::Numeric
        );
    }
}
