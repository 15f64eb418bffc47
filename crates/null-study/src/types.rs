//! Core value types shared across the pipeline.

use crate::error::{Result, StudyError};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Column classification
// ============================================================================

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Disjoint, order-preserving split of a table's column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPartition {
    pub categorical: Vec<String>,
    pub numeric: Vec<String>,
}

// ============================================================================
// Thresholds and structural edits
// ============================================================================

/// A null-ratio threshold, a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// Validate a percentage. NaN and values outside `[0, 100]` are rejected.
    pub fn new(percent: f64) -> Result<Self> {
        if (0.0..=100.0).contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(StudyError::InvalidThreshold(percent.to_string()))
        }
    }

    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = StudyError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}

impl FromStr for Threshold {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| StudyError::InvalidThreshold(s.to_string()))?;
        Self::new(value)
    }
}

/// Shortest round-trip form: `60` for 60.0, `12.5` for 12.5.
impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deterministic structural edit applied during a purge/flag session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructuralEdit {
    /// Remove one column.
    PurgeColumn(String),
    /// Remove every column whose null percentage is strictly greater than the threshold.
    PurgeByNullRatio(Threshold),
    /// Turn one column into a presence indicator.
    FlagColumn(String),
    /// Flag every column whose null percentage is strictly greater than the threshold.
    FlagByNullRatio(Threshold),
}

impl FromStr for StructuralEdit {
    type Err = StudyError;

    /// Parses `purge:COL`, `purge-per:PCT`, `flag:COL` or `flag-per:PCT`.
    fn from_str(s: &str) -> Result<Self> {
        let (op, arg) = s
            .split_once(':')
            .ok_or_else(|| StudyError::InvalidEdit(s.to_string()))?;
        if arg.is_empty() {
            return Err(StudyError::InvalidEdit(s.to_string()));
        }

        match op.trim().to_ascii_lowercase().as_str() {
            "purge" => Ok(Self::PurgeColumn(arg.to_string())),
            "purge-per" | "purge_per" => Ok(Self::PurgeByNullRatio(arg.parse()?)),
            "flag" => Ok(Self::FlagColumn(arg.to_string())),
            "flag-per" | "flag_per" => Ok(Self::FlagByNullRatio(arg.parse()?)),
            _ => Err(StudyError::InvalidEdit(s.to_string())),
        }
    }
}

// ============================================================================
// Imputation
// ============================================================================

/// Strategy used to fill remaining nulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputationStrategy {
    Mean,
    Median,
    MostFrequent,
    Knn { neighbors: usize },
}

impl ImputationStrategy {
    /// KNN strategy from a user-supplied neighbor count.
    pub fn knn(k: i64) -> Result<Self> {
        if k <= 0 {
            return Err(StudyError::InvalidNeighbors(k));
        }
        Ok(Self::Knn {
            neighbors: k as usize,
        })
    }

    /// Fragment used when naming the imputed table.
    pub fn label(&self) -> String {
        match self {
            Self::Mean => "mean".to_string(),
            Self::Median => "median".to_string(),
            Self::MostFrequent => "most-frequent".to_string(),
            Self::Knn { neighbors } => format!("{neighbors}-nearest"),
        }
    }
}

/// Non-fatal conditions encountered while imputing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputationWarning {
    /// The column had no non-null value, so no statistic exists; it was left as-is.
    DegenerateColumn { column: String },
    /// Fewer usable donors than requested were found for some cells.
    InsufficientNeighbors {
        column: String,
        requested: usize,
        min_available: usize,
        cells: usize,
    },
}

impl fmt::Display for ImputationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateColumn { column } => {
                write!(f, "column '{column}' is entirely null and was left unchanged")
            }
            Self::InsufficientNeighbors {
                column,
                requested,
                min_available,
                cells,
            } => write!(
                f,
                "column '{column}': {cells} cells had fewer than {requested} neighbors (as few as {min_available})"
            ),
        }
    }
}

/// Output of an imputation call: the new table plus anything absorbed along the way.
#[derive(Debug, Clone)]
pub struct ImputationOutcome {
    pub table: DataFrame,
    pub warnings: Vec<ImputationWarning>,
}

impl ImputationOutcome {
    /// Columns that passed through untouched because they were entirely null.
    pub fn degenerate_columns(&self) -> Vec<&str> {
        self.warnings
            .iter()
            .filter_map(|w| match w {
                ImputationWarning::DegenerateColumn { column } => Some(column.as_str()),
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Null statistics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNullSummary {
    pub name: String,
    pub null_count: usize,
    /// Percentage in `[0, 100]`.
    pub null_percentage: f64,
    pub dtype: String,
    pub kind: ColumnKind,
}
