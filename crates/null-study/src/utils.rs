//! Shared utilities for the null study pipeline.

use crate::error::{Result, StudyError};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType stores text values.
#[inline]
pub fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::String | DataType::Categorical(..) | DataType::Enum(..)
    )
}

// =============================================================================
// Column Access
// =============================================================================

/// Look up a column as a materialized Series, mapping a miss to `ColumnNotFound`.
pub fn column_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| StudyError::ColumnNotFound(name.to_string()))
}

/// Column names in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Null share of a column as a percentage. A zero-row table has no nulls.
pub fn null_percentage(null_count: usize, height: usize) -> f64 {
    if height == 0 {
        0.0
    } else {
        null_count as f64 / height as f64 * 100.0
    }
}

// =============================================================================
// Series Conversion
// =============================================================================

/// Read a numeric-like Series as `f64` values. NaN reads as missing.
pub fn series_to_f64(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Turn NaN into null on float columns; other dtypes come back as-is.
pub fn nan_as_null(series: &Series) -> PolarsResult<Series> {
    match series.dtype() {
        DataType::Float32 | DataType::Float64 => {
            Ok(Series::new(series.name().clone(), series_to_f64(series)?))
        }
        _ => Ok(series.clone()),
    }
}

/// Fill null values in a numeric Series with a specific value, producing `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values: Vec<Option<f64>> = series_to_f64(series)?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Assemble a table from columns taken in order.
pub fn frame_from_series(columns: Vec<Series>) -> PolarsResult<DataFrame> {
    DataFrame::new(columns.into_iter().map(Column::from).collect())
}

// =============================================================================
// Tests
// =============================================================================
