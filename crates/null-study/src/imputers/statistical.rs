//! Statistical imputation methods.
//!
//! Mean, median and most-frequent fills, each computed per column from that
//! column's non-null values only. NaN counts as null.

use crate::error::{Result, StudyError};
use crate::types::{ImputationOutcome, ImputationStrategy, ImputationWarning};
use crate::utils::{fill_numeric_nulls, frame_from_series, nan_as_null, series_to_f64};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Column statistic used as the fill value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Mean,
    Median,
    MostFrequent,
}

impl TryFrom<ImputationStrategy> for Statistic {
    type Error = StudyError;

    fn try_from(strategy: ImputationStrategy) -> Result<Self> {
        match strategy {
            ImputationStrategy::Mean => Ok(Self::Mean),
            ImputationStrategy::Median => Ok(Self::Median),
            ImputationStrategy::MostFrequent => Ok(Self::MostFrequent),
            ImputationStrategy::Knn { .. } => Err(StudyError::InvalidConfig(
                "KNN is not a column statistic".to_string(),
            )),
        }
    }
}

/// Per-column statistical imputer over a block of numeric columns.
pub struct StatisticalImputer {
    statistic: Statistic,
}

impl StatisticalImputer {
    pub fn new(statistic: Statistic) -> Self {
        Self { statistic }
    }

    /// Fill every column of `block`. Filled columns come back as `Float64`;
    /// entirely-null columns come back untouched with a warning.
    pub fn fit_transform(&self, block: &DataFrame) -> Result<ImputationOutcome> {
        let mut columns = Vec::with_capacity(block.width());
        let mut warnings = Vec::new();

        for column in block.get_columns() {
            let series = nan_as_null(column.as_materialized_series())?;
            let name = series.name().to_string();

            match self.statistic_for(&series)? {
                Some(fill) => {
                    debug!("Filling '{}' with {:?} {:.4}", name, self.statistic, fill);
                    columns.push(fill_numeric_nulls(&series, fill)?);
                }
                None => {
                    warn!(
                        "Column '{}' has no non-null values; {:?} is undefined, leaving it unchanged",
                        name, self.statistic
                    );
                    warnings.push(ImputationWarning::DegenerateColumn { column: name });
                    columns.push(series);
                }
            }
        }

        Ok(ImputationOutcome {
            table: frame_from_series(columns)?,
            warnings,
        })
    }

    /// Statistic over the non-null values, or `None` if there are none.
    fn statistic_for(&self, series: &Series) -> Result<Option<f64>> {
        if series.null_count() == series.len() {
            return Ok(None);
        }

        let value = match self.statistic {
            Statistic::Mean => series.cast(&DataType::Float64)?.mean(),
            Statistic::Median => series.cast(&DataType::Float64)?.median(),
            Statistic::MostFrequent => most_frequent(&series_to_f64(series)?),
        };

        Ok(value)
    }
}

/// Most frequent non-null value; ties go to the value seen first.
pub fn most_frequent(values: &[Option<f64>]) -> Option<f64> {
    // bits -> (count, first position)
    let mut counts: HashMap<u64, (usize, usize)> = HashMap::new();
    for (idx, value) in values.iter().enumerate() {
        if let Some(v) = value {
            let entry = counts.entry(v.to_bits()).or_insert((0, idx));
            entry.0 += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(bits, _)| f64::from_bits(bits))
}
