//! Imputation executor.
//!
//! Routes identifier columns around imputation, splits the rest into a
//! numeric and a categorical block, imputes the numeric block and
//! reassembles `identifiers ++ numeric ++ categorical`.

use crate::config::{OneHotMerge, StudyConfig};
use crate::encoding::encode_one_hot;
use crate::error::Result;
use crate::imputers::{KNNImputer, Statistic, StatisticalImputer};
use crate::profiler::partition_columns;
use crate::types::{ImputationOutcome, ImputationStrategy, ImputationWarning};
use crate::utils::{column_series, frame_from_series};
use polars::prelude::*;
use tracing::{debug, info};

/// Imputer for one numeric block.
enum BlockImputer {
    Statistical(StatisticalImputer),
    Knn(KNNImputer),
}

impl BlockImputer {
    fn for_strategy(strategy: ImputationStrategy) -> Result<Self> {
        Ok(match strategy {
            ImputationStrategy::Knn { neighbors } => Self::Knn(KNNImputer::new(neighbors)?),
            other => Self::Statistical(StatisticalImputer::new(Statistic::try_from(other)?)),
        })
    }

    fn fit_transform(&self, block: &DataFrame) -> Result<ImputationOutcome> {
        match self {
            Self::Statistical(imputer) => imputer.fit_transform(block),
            Self::Knn(imputer) => imputer.fit_transform(block),
        }
    }
}

/// Runs imputation strategies over whole tables.
pub struct ImputationExecutor<'a> {
    config: &'a StudyConfig,
}

impl<'a> ImputationExecutor<'a> {
    pub fn new(config: &'a StudyConfig) -> Self {
        Self { config }
    }

    /// Impute `df` with `strategy`. With `one_hot`, the categorical block is
    /// also encoded and imputed; whether that result reaches the output is
    /// decided by [`StudyConfig::one_hot_merge`].
    pub fn impute(
        &self,
        df: &DataFrame,
        strategy: ImputationStrategy,
        one_hot: bool,
    ) -> Result<ImputationOutcome> {
        let imputer = BlockImputer::for_strategy(strategy)?;

        let (identifiers, rest): (Vec<String>, Vec<String>) = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .partition(|name| self.config.is_identifier(name));

        let rest_df = select(df, &rest)?;
        let partition = partition_columns(&rest_df);
        debug!(
            "Imputing {} numeric columns with {:?}; {} categorical, {} identifier columns pass through",
            partition.numeric.len(),
            strategy,
            partition.categorical.len(),
            identifiers.len()
        );

        let numeric = imputer.fit_transform(&select(&rest_df, &partition.numeric)?)?;
        let mut warnings = numeric.warnings;

        let categorical_block = if one_hot {
            // Encoded against the whole table so no indicator shadows an identifier
            let encoding = encode_one_hot(df, &partition.categorical)?;
            debug!(
                "One-hot encoded {} categorical columns into {} indicators ({} set cells)",
                partition.categorical.len(),
                encoding.indicators().len(),
                encoding.nnz()
            );
            let indicators = imputer.fit_transform(&encoding.to_frame()?)?;

            match self.config.one_hot_merge {
                OneHotMerge::Discard => select(&rest_df, &partition.categorical)?,
                OneHotMerge::Replace => {
                    warnings.extend(indicators.warnings);
                    indicators.table
                }
            }
        } else {
            select(&rest_df, &partition.categorical)?
        };

        let mut columns = Vec::with_capacity(df.width());
        for name in &identifiers {
            columns.push(column_series(df, name)?.clone());
        }
        for block in [&numeric.table, &categorical_block] {
            columns.extend(
                block
                    .get_columns()
                    .iter()
                    .map(|c| c.as_materialized_series().clone()),
            );
        }

        let table = frame_from_series(columns)?;
        info!(
            "Imputation with {} finished: {} rows x {} columns, {} warnings",
            strategy.label(),
            table.height(),
            table.width(),
            warnings.len()
        );

        Ok(ImputationOutcome { table, warnings })
    }
}

/// Sub-table of `names`, in the given order.
fn select(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    let columns = names
        .iter()
        .map(|name| column_series(df, name).cloned())
        .collect::<Result<Vec<_>>>()?;
    Ok(frame_from_series(columns)?)
}

/// Mean, median or most-frequent imputation of the numeric columns.
pub fn impute_numeric(
    df: &DataFrame,
    strategy: ImputationStrategy,
    config: &StudyConfig,
) -> Result<ImputationOutcome> {
    Statistic::try_from(strategy)?;
    ImputationExecutor::new(config).impute(df, strategy, false)
}

/// KNN imputation of the numeric columns. `k` must be positive.
pub fn impute_knn(df: &DataFrame, k: i64, config: &StudyConfig) -> Result<ImputationOutcome> {
    let strategy = ImputationStrategy::knn(k)?;
    ImputationExecutor::new(config).impute(df, strategy, false)
}

/// True if any warning reports an entirely-null column.
pub fn has_degenerate_columns(warnings: &[ImputationWarning]) -> bool {
    warnings
        .iter()
        .any(|w| matches!(w, ImputationWarning::DegenerateColumn { .. }))
}
