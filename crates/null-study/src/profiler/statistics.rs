//! Per-column null statistics.

use super::type_inference::column_kind;
use crate::types::ColumnNullSummary;
use crate::utils::null_percentage;
use polars::prelude::*;

/// Null count, null percentage, dtype and kind for every column, in table order.
pub fn analyze_nulls(df: &DataFrame) -> Vec<ColumnNullSummary> {
    let height = df.height();

    df.get_columns()
        .iter()
        .map(|column| {
            let series = column.as_materialized_series();
            let null_count = series.null_count();
            ColumnNullSummary {
                name: column.name().to_string(),
                null_count,
                null_percentage: null_percentage(null_count, height),
                dtype: format!("{}", series.dtype()),
                kind: column_kind(series),
            }
        })
        .collect()
}

/// Columns whose null percentage is strictly greater than `percent`.
pub fn columns_above_null_ratio(df: &DataFrame, percent: f64) -> Vec<String> {
    analyze_nulls(df)
        .into_iter()
        .filter(|summary| summary.null_percentage > percent)
        .map(|summary| summary.name)
        .collect()
}
