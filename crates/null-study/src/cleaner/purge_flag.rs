//! Purge and flag edits.
//!
//! Every function takes a table by reference and returns a new one. Row
//! count never changes. Ratio-based edits use a strict `>` against the
//! threshold: a column at exactly the threshold is kept as-is.

use crate::error::Result;
use crate::profiler::columns_above_null_ratio;
use crate::types::{StructuralEdit, Threshold};
use crate::utils::column_series;
use polars::prelude::*;
use tracing::debug;

/// Remove one column.
pub fn apply_purge(df: &DataFrame, column: &str) -> Result<DataFrame> {
    column_series(df, column)?;
    debug!("Purging column '{}'", column);
    Ok(df.drop(column)?)
}

/// Remove every column whose null percentage is strictly greater than `threshold`.
pub fn apply_purge_by_ratio(df: &DataFrame, threshold: Threshold) -> Result<DataFrame> {
    let to_drop = columns_above_null_ratio(df, threshold.percent());
    debug!(
        "Purging {} columns above {}% nulls: {:?}",
        to_drop.len(),
        threshold,
        to_drop
    );

    let names: Vec<PlSmallStr> = to_drop.iter().map(|s| s.as_str().into()).collect();
    Ok(df.clone().drop_many(names))
}

/// Replace a column with its presence indicator: `true` where a value was
/// present, `false` where it was null. Name and position are kept.
///
/// A null-free `Boolean` column is taken to be an earlier flag result and is
/// returned unchanged, so flagging twice equals flagging once. This also
/// applies to a genuine sensor boolean without nulls: `[true, false, true]`
/// stays as-is rather than becoming all `true`.
pub fn apply_flag(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let series = column_series(df, column)?;
    if is_presence_indicator(series) {
        debug!("Column '{}' is already a presence indicator", column);
        return Ok(df.clone());
    }

    let presence = series
        .is_not_null()
        .with_name(series.name().clone())
        .into_series();

    let mut flagged = df.clone();
    flagged.replace(column, presence)?;
    debug!("Flagged column '{}'", column);
    Ok(flagged)
}

/// Flag every column whose null percentage is strictly greater than `threshold`.
pub fn apply_flag_by_ratio(df: &DataFrame, threshold: Threshold) -> Result<DataFrame> {
    let to_flag = columns_above_null_ratio(df, threshold.percent());
    debug!(
        "Flagging {} columns above {}% nulls: {:?}",
        to_flag.len(),
        threshold,
        to_flag
    );

    let mut flagged = df.clone();
    for column in &to_flag {
        flagged = apply_flag(&flagged, column)?;
    }
    Ok(flagged)
}

/// Apply any [`StructuralEdit`].
pub fn apply_edit(df: &DataFrame, edit: &StructuralEdit) -> Result<DataFrame> {
    match edit {
        StructuralEdit::PurgeColumn(column) => apply_purge(df, column),
        StructuralEdit::PurgeByNullRatio(threshold) => apply_purge_by_ratio(df, *threshold),
        StructuralEdit::FlagColumn(column) => apply_flag(df, column),
        StructuralEdit::FlagByNullRatio(threshold) => apply_flag_by_ratio(df, *threshold),
    }
}

/// A null-free boolean column is the output of a previous flag.
fn is_presence_indicator(series: &Series) -> bool {
    series.dtype() == &DataType::Boolean && series.null_count() == 0
}
