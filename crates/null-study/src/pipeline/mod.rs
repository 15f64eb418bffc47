//! Pipeline module.
//!
//! Whole-table operations built from the lower-level components: imputation
//! with identifier routing, and purge/flag sessions.

mod executor;
mod session;

pub use executor::{ImputationExecutor, has_degenerate_columns, impute_knn, impute_numeric};
pub use session::{PurgeFlagSession, SessionOutcome};
