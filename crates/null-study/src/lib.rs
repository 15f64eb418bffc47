//! Null Study Library
//!
//! Tools for studying and mitigating missing values in tabular sensor data,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! - **Profiling**: categorical/numeric column partition and per-column null report
//! - **Structural edits**: purge or flag columns, individually or by null ratio
//! - **Provenance**: derived tables are named by the edits that produced them
//! - **Imputation**: mean, median, most-frequent and k-nearest-neighbor fills,
//!   optionally over a one-hot encoding of the categorical columns
//! - **Catalog**: persistence, imputability registry and listings over a
//!   pluggable [`store::TableStore`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use null_study::{Catalog, ImputationStrategy, PurgeFlagSession, StudyConfig};
//! use null_study::store::ParquetStore;
//!
//! let mut catalog = Catalog::new(ParquetStore::open("data")?, StudyConfig::default());
//! let aggregate = catalog.read("aggregate")?;
//!
//! // Derive "p-60_f-wind" and register it as imputable
//! let outcome = PurgeFlagSession::new(&aggregate)
//!     .apply("purge-per:60".parse()?)?
//!     .apply("flag:wind".parse()?)?
//!     .finish();
//! let name = catalog.materialize(outcome)?.expect("edits were applied");
//!
//! // Writes "p-60_f-wind_3-nearest-imputed"
//! let imputed = catalog.impute(&name, ImputationStrategy::knn(3)?, false)?;
//! for warning in &imputed.outcome.warnings {
//!     println!("{warning}");
//! }
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use null_study::config::*;
//!
//! let config = StudyConfig::builder()
//!     .identifier_columns(["station", "date"])
//!     .one_hot_merge(OneHotMerge::Replace)
//!     .duplicate_policy(DuplicatePolicy::Version)
//!     .build()?;
//! ```

pub mod catalog;
pub mod cleaner;
pub mod config;
pub mod encoding;
pub mod error;
pub mod export;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod provenance;
pub mod store;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use catalog::{Catalog, ImputedTable};
pub use cleaner::{apply_edit, apply_flag, apply_flag_by_ratio, apply_purge, apply_purge_by_ratio};
pub use config::{
    ConfigValidationError, DuplicatePolicy, OneHotMerge, StudyConfig, StudyConfigBuilder,
};
pub use encoding::{OneHotEncoding, encode_one_hot};
pub use error::{Result as StudyResult, ResultExt, StudyError};
pub use export::{export_csv, load_csv};
pub use imputers::{KNNImputer, StatisticalImputer};
pub use pipeline::{
    ImputationExecutor, PurgeFlagSession, SessionOutcome, impute_knn, impute_numeric,
};
pub use profiler::{analyze_nulls, partition_columns};
pub use provenance::{Provenance, imputed_table_name};
pub use store::{MemoryStore, ParquetStore, TableStore};
pub use types::{
    ColumnKind, ColumnNullSummary, ColumnPartition, ImputationOutcome, ImputationStrategy,
    ImputationWarning, StructuralEdit, Threshold,
};
