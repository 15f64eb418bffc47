//! Sparse one-hot encoding of categorical columns.
//!
//! Each distinct observed (column, value) pair becomes one indicator named
//! `<column>_<value>`. Values within a column are ordered lexicographically.
//! Null never produces an indicator, so a null row is 0 everywhere.
//!
//! A name already taken by a table column or an earlier indicator gets the
//! first free `_<n>` suffix, starting at 1.

use crate::error::Result;
use crate::utils::column_series;
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};

/// One binary indicator column stored as the rows where it is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub name: String,
    pub source_column: String,
    pub value: String,
    /// Ascending row indices holding `value`.
    pub rows: Vec<usize>,
}

/// Sparse indicator table over a set of categorical columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneHotEncoding {
    height: usize,
    indicators: Vec<Indicator>,
}

impl OneHotEncoding {
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    /// Number of set cells.
    pub fn nnz(&self) -> usize {
        self.indicators.iter().map(|i| i.rows.len()).sum()
    }

    /// Dense `UInt8` view, one column per indicator.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let columns = self
            .indicators
            .iter()
            .map(|indicator| {
                let mut values = vec![0u8; self.height];
                for &row in &indicator.rows {
                    values[row] = 1;
                }
                Column::new(indicator.name.as_str().into(), values)
            })
            .collect();

        DataFrame::new(columns)
    }
}

/// Encode `categorical` columns of `df` as sparse indicators.
///
/// Indicator names never repeat each other or any column name of `df`.
pub fn encode_one_hot(df: &DataFrame, categorical: &[String]) -> Result<OneHotEncoding> {
    let mut indicators = Vec::new();
    let mut taken: HashSet<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for name in categorical {
        let series = column_series(df, name)?.cast(&DataType::String)?;
        let values = series.str()?;

        let mut by_value: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (row, value) in values.into_iter().enumerate() {
            if let Some(value) = value {
                by_value.entry(value).or_default().push(row);
            }
        }

        for (value, rows) in by_value {
            let indicator_name = unique_name(format!("{name}_{value}"), &mut taken);
            indicators.push(Indicator {
                name: indicator_name,
                source_column: name.clone(),
                value: value.to_string(),
                rows,
            });
        }
    }

    Ok(OneHotEncoding {
        height: df.height(),
        indicators,
    })
}

/// `base`, or `base_<n>` for the smallest free `n`; the result is marked taken.
fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut n = 1;
    while taken.contains(&name) {
        name = format!("{base}_{n}");
        n += 1;
    }
    taken.insert(name.clone());
    name
}
