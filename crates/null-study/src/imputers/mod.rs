//! Imputation module for handling missing values.
//!
//! This module provides the imputation strategies:
//! - KNN imputation
//! - Statistical imputation (mean, median, most frequent)
//!
//! Both operate on a block of numeric columns; routing of identifier and
//! categorical columns around them lives in [`crate::pipeline`].

mod knn;
mod statistical;

pub use knn::KNNImputer;
pub use statistical::{Statistic, StatisticalImputer, most_frequent};
