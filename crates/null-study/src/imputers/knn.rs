use crate::error::{Result, StudyError};
use crate::types::{ImputationOutcome, ImputationWarning};
use crate::utils::{frame_from_series, nan_as_null, series_to_f64};
use polars::prelude::*;
use tracing::{debug, warn};

/// K-nearest-neighbor imputer over a block of numeric columns.
///
/// Distances use the masked ("nan") Euclidean metric: only dimensions
/// present in both rows count, and the sum is scaled up by
/// `n_features / n_shared`. Donors are averaged with uniform weight.
pub struct KNNImputer {
    n_neighbors: usize,
}

impl KNNImputer {
    /// Create a new KNN imputer. `k` must be at least 1.
    pub fn new(n_neighbors: usize) -> Result<Self> {
        if n_neighbors == 0 {
            return Err(StudyError::InvalidNeighbors(0));
        }
        Ok(Self { n_neighbors })
    }

    /// Fit and transform the block, imputing missing values in every column.
    pub fn fit_transform(&self, block: &DataFrame) -> Result<ImputationOutcome> {
        let names: Vec<PlSmallStr> = block
            .get_columns()
            .iter()
            .map(|c| c.name().clone())
            .collect();
        let matrix = self.create_data_matrix(block)?;
        let n_rows = block.height();
        let n_cols = names.len();

        let mut imputed = matrix.clone();
        let mut warnings = Vec::new();

        // Entirely-null columns have no donors and no fallback mean.
        let degenerate: Vec<bool> = (0..n_cols)
            .map(|col| matrix.iter().all(|row| row[col].is_none()))
            .collect();
        let column_means: Vec<Option<f64>> = (0..n_cols)
            .map(|col| column_mean(&matrix, col))
            .collect();
        // Per column: (cells short of k, smallest donor count seen)
        let mut shortfall: Vec<(usize, usize)> = vec![(0, usize::MAX); n_cols];

        for row in 0..n_rows {
            let missing: Vec<usize> = (0..n_cols)
                .filter(|&col| matrix[row][col].is_none() && !degenerate[col])
                .collect();
            if missing.is_empty() {
                continue;
            }

            let distances: Vec<f64> = (0..n_rows)
                .map(|other| {
                    if other == row {
                        f64::INFINITY
                    } else {
                        self.calculate_distance(&matrix[row], &matrix[other])
                    }
                })
                .collect();

            for col in missing {
                let mut donors: Vec<(usize, f64)> = (0..n_rows)
                    .filter(|&other| matrix[other][col].is_some() && distances[other].is_finite())
                    .map(|other| (other, distances[other]))
                    .collect();

                // Stable: equal distances keep row order.
                donors.sort_by(|a, b| a.1.total_cmp(&b.1));

                if donors.len() < self.n_neighbors {
                    let entry = &mut shortfall[col];
                    entry.0 += 1;
                    entry.1 = entry.1.min(donors.len());
                }

                let value = if donors.is_empty() {
                    column_means[col]
                } else {
                    let k = self.n_neighbors.min(donors.len());
                    let sum: f64 = donors
                        .iter()
                        .take(k)
                        .filter_map(|&(donor, _)| matrix[donor][col])
                        .sum();
                    Some(sum / k as f64)
                };

                imputed[row][col] = value;
            }
        }

        let mut columns = Vec::with_capacity(n_cols);
        for (col, name) in names.iter().enumerate() {
            if degenerate[col] {
                warn!("Column '{}' has no non-null values; leaving it unchanged", name);
                warnings.push(ImputationWarning::DegenerateColumn {
                    column: name.to_string(),
                });
                let original = block.column(name.as_str())?.as_materialized_series();
                columns.push(nan_as_null(original)?);
                continue;
            }

            let (cells, min_available) = shortfall[col];
            if cells > 0 {
                debug!(
                    "Column '{}': {} cells had fewer than {} donors (min {})",
                    name, cells, self.n_neighbors, min_available
                );
                warnings.push(ImputationWarning::InsufficientNeighbors {
                    column: name.to_string(),
                    requested: self.n_neighbors,
                    min_available,
                    cells,
                });
            }

            let values: Vec<Option<f64>> = imputed.iter().map(|row| row[col]).collect();
            columns.push(Series::new(name.clone(), values));
        }

        Ok(ImputationOutcome {
            table: frame_from_series(columns)?,
            warnings,
        })
    }

    /// Create a row-major data matrix from the block for distance calculations
    fn create_data_matrix(&self, block: &DataFrame) -> Result<Vec<Vec<Option<f64>>>> {
        let n_rows = block.height();
        let n_cols = block.width();
        let mut matrix = vec![vec![None; n_cols]; n_rows];

        for (col_idx, column) in block.get_columns().iter().enumerate() {
            let values = series_to_f64(column.as_materialized_series())?;
            for (row, value) in matrix.iter_mut().zip(values) {
                row[col_idx] = value;
            }
        }

        Ok(matrix)
    }

    /// Masked Euclidean distance. Infinite when the rows share no dimension.
    fn calculate_distance(&self, row1: &[Option<f64>], row2: &[Option<f64>]) -> f64 {
        let n_cols = row1.len();
        let mut sum_squared_diff = 0.0;
        let mut shared = 0;

        for (a, b) in row1.iter().zip(row2) {
            if let (Some(a), Some(b)) = (a, b) {
                let diff = a - b;
                sum_squared_diff += diff * diff;
                shared += 1;
            }
        }

        if shared > 0 {
            (sum_squared_diff * n_cols as f64 / shared as f64).sqrt()
        } else {
            f64::INFINITY
        }
    }
}

fn column_mean(matrix: &[Vec<Option<f64>>], col: usize) -> Option<f64> {
    let (sum, count) = matrix
        .iter()
        .filter_map(|row| row[col])
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}
