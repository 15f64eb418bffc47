//! Catalog of stored tables.
//!
//! Ties the pure pipeline to a [`TableStore`]: persists purge/flag results
//! and registers them as imputable, answers imputability queries, hides
//! bookkeeping tables from listings and names and writes imputation results.

use crate::config::{DuplicatePolicy, StudyConfig};
use crate::error::{Result, ResultExt, StudyError};
use crate::pipeline::{ImputationExecutor, SessionOutcome};
use crate::provenance::imputed_table_name;
use crate::store::{MemoryStore, TableStore};
use crate::types::{ImputationOutcome, ImputationStrategy};
use polars::prelude::DataFrame;
use tracing::{info, warn};

/// A persisted imputation result.
#[derive(Debug, Clone)]
pub struct ImputedTable {
    pub name: String,
    pub outcome: ImputationOutcome,
}

/// Store plus study configuration.
pub struct Catalog<S: TableStore> {
    store: S,
    config: StudyConfig,
}

static_assertions::assert_impl_all!(Catalog<MemoryStore>: Send);

impl<S: TableStore> Catalog<S> {
    pub fn new(store: S, config: StudyConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn read(&self, name: &str) -> Result<DataFrame> {
        self.store.read_table(name)
    }

    /// Write `table` under `name` without registering it.
    pub fn write(&mut self, name: &str, table: &DataFrame) -> Result<()> {
        self.store.write_table(name, table)
    }

    /// Persist and register a finished purge/flag session.
    ///
    /// Returns the name the table was stored under, or `None` for a no-op
    /// session.
    pub fn materialize(&mut self, outcome: SessionOutcome) -> Result<Option<String>> {
        let (name, table) = match outcome {
            SessionOutcome::NoOp => {
                info!("No edits applied; nothing to materialize");
                return Ok(None);
            }
            SessionOutcome::Derived { name, table } => (name, table),
        };

        let name = self.resolve_name(&name)?;
        self.store
            .write_table(&name, &table)
            .context(format!("Materializing '{name}'"))?;
        self.store.register_imputable(&name)?;
        info!("Materialized '{}' ({} x {})", name, table.height(), table.width());
        Ok(Some(name))
    }

    /// The root table and every registered table are imputable.
    pub fn is_imputable(&self, name: &str) -> Result<bool> {
        if name == self.config.root_table {
            return Ok(true);
        }
        Ok(self.store.imputables()?.iter().any(|n| n == name))
    }

    /// Imputable tables, root first, then in registration order.
    pub fn imputable_tables(&self) -> Result<Vec<String>> {
        let mut names = vec![self.config.root_table.clone()];
        for name in self.store.imputables()? {
            if name != self.config.root_table {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Stored tables without the configured bookkeeping tables.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let hidden = &self.config.hidden_tables;
        Ok(self
            .store
            .list_table_names()?
            .into_iter()
            .filter(|name| !hidden.contains(name))
            .collect())
    }

    /// Impute the stored table `name` and write the result.
    ///
    /// The result is not registered as imputable.
    pub fn impute(
        &mut self,
        name: &str,
        strategy: ImputationStrategy,
        one_hot: bool,
    ) -> Result<ImputedTable> {
        if !self.is_imputable(name)? {
            return Err(StudyError::NotImputable(name.to_string()));
        }

        let source = self.read(name)?;
        let outcome = ImputationExecutor::new(&self.config)
            .impute(&source, strategy, one_hot)
            .context(format!("Imputing '{name}'"))?;

        let target = self.resolve_name(&imputed_table_name(name, &strategy, one_hot))?;
        self.store.write_table(&target, &outcome.table)?;
        info!(
            "Wrote '{}' from '{}' ({} warnings)",
            target,
            name,
            outcome.warnings.len()
        );

        Ok(ImputedTable {
            name: target,
            outcome,
        })
    }

    /// Apply the duplicate-name policy to `name`.
    fn resolve_name(&self, name: &str) -> Result<String> {
        if !self.store.contains_table(name) {
            return Ok(name.to_string());
        }

        match self.config.duplicate_policy {
            DuplicatePolicy::Replace => {
                warn!("Table '{}' exists and will be replaced", name);
                Ok(name.to_string())
            }
            DuplicatePolicy::Reject => Err(StudyError::TableExists(name.to_string())),
            DuplicatePolicy::Version => {
                let mut version = 2;
                loop {
                    let candidate = format!("{name}-v{version}");
                    if !self.store.contains_table(&candidate) {
                        return Ok(candidate);
                    }
                    version += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PurgeFlagSession;
    use crate::types::{StructuralEdit, Threshold};
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn aggregate() -> DataFrame {
        df![
            "station" => ["s1", "s2", "s3", "s4"],
            "x" => [Some(1.0), None, None, None],
            "y" => [Some(1.0), None, Some(3.0), None],
            "z" => [Some(2.0), Some(4.0), Some(6.0), Some(8.0)],
        ]
        .unwrap()
    }

    fn catalog(policy: DuplicatePolicy) -> Catalog<MemoryStore> {
        let config = StudyConfig::builder()
            .duplicate_policy(policy)
            .build()
            .unwrap();
        let store = MemoryStore::new().with_table("aggregate", aggregate()).unwrap();
        Catalog::new(store, config)
    }

    fn purge_x(source: &DataFrame) -> SessionOutcome {
        PurgeFlagSession::new(source)
            .apply(StructuralEdit::PurgeColumn("x".to_string()))
            .unwrap()
            .finish()
    }

    #[test]
    fn test_root_is_always_imputable() {
        let catalog = catalog(DuplicatePolicy::Replace);
        assert!(catalog.is_imputable("aggregate").unwrap());
        assert!(!catalog.is_imputable("p-x").unwrap());
    }

    #[test]
    fn test_materialize_registers() {
        let mut catalog = catalog(DuplicatePolicy::Replace);
        let source = catalog.read("aggregate").unwrap();

        let name = catalog.materialize(purge_x(&source)).unwrap();
        assert_eq!(name.as_deref(), Some("p-x"));
        assert!(catalog.is_imputable("p-x").unwrap());
        assert_eq!(catalog.imputable_tables().unwrap(), vec!["aggregate", "p-x"]);
        assert_eq!(catalog.read("p-x").unwrap().width(), 3);
    }

    #[test]
    fn test_noop_session_creates_nothing() {
        let mut catalog = catalog(DuplicatePolicy::Replace);
        let source = catalog.read("aggregate").unwrap();

        let outcome = PurgeFlagSession::new(&source).finish();
        assert_eq!(catalog.materialize(outcome).unwrap(), None);
        assert_eq!(catalog.list_tables().unwrap(), vec!["aggregate"]);
    }

    #[test]
    fn test_duplicate_replace_keeps_single_entry() {
        let mut catalog = catalog(DuplicatePolicy::Replace);
        let source = catalog.read("aggregate").unwrap();

        catalog.materialize(purge_x(&source)).unwrap();
        catalog.materialize(purge_x(&source)).unwrap();
        assert_eq!(catalog.imputable_tables().unwrap(), vec!["aggregate", "p-x"]);
    }

    #[test]
    fn test_duplicate_reject() {
        let mut catalog = catalog(DuplicatePolicy::Reject);
        let source = catalog.read("aggregate").unwrap();

        catalog.materialize(purge_x(&source)).unwrap();
        let err = catalog.materialize(purge_x(&source)).unwrap_err();
        assert!(matches!(err, StudyError::TableExists(name) if name == "p-x"));
    }

    #[test]
    fn test_duplicate_version() {
        let mut catalog = catalog(DuplicatePolicy::Version);
        let source = catalog.read("aggregate").unwrap();

        let names: Vec<_> = (0..3)
            .map(|_| catalog.materialize(purge_x(&source)).unwrap().unwrap())
            .collect();
        assert_eq!(names, vec!["p-x", "p-x-v2", "p-x-v3"]);
    }

    #[test]
    fn test_materialize_column_name_with_space() {
        let mut catalog = catalog(DuplicatePolicy::Replace);
        let source = df![
            "station" => ["s1", "s2"],
            "Air Temp" => [Some(1.0), None],
        ]
        .unwrap();

        let outcome = PurgeFlagSession::new(&source)
            .apply(StructuralEdit::PurgeColumn("Air Temp".to_string()))
            .unwrap()
            .finish();
        let name = catalog.materialize(outcome).unwrap();

        assert_eq!(name.as_deref(), Some("p-Air Temp"));
        assert!(catalog.is_imputable("p-Air Temp").unwrap());
        assert_eq!(catalog.read("p-Air Temp").unwrap().width(), 1);
    }

    #[test]
    fn test_list_hides_bookkeeping_tables() {
        let mut catalog = catalog(DuplicatePolicy::Replace);
        let empty = df!["id" => [1]].unwrap();
        catalog.write("sensors", &empty).unwrap();
        catalog.write("expeditions", &empty).unwrap();
        catalog.write("readings", &empty).unwrap();

        assert_eq!(catalog.list_tables().unwrap(), vec!["aggregate", "readings"]);
    }

    #[test]
    fn test_impute_writes_without_registering() {
        let mut catalog = catalog(DuplicatePolicy::Replace);
        let source = catalog.read("aggregate").unwrap();
        let derived = PurgeFlagSession::new(&source)
            .apply(StructuralEdit::PurgeByNullRatio(Threshold::new(60.0).unwrap()))
            .unwrap()
            .finish();
        let name = catalog.materialize(derived).unwrap().unwrap();
        assert_eq!(name, "p-60");

        let imputed = catalog
            .impute(&name, ImputationStrategy::Mean, false)
            .unwrap();
        assert_eq!(imputed.name, "p-60_mean-imputed");
        assert_eq!(imputed.outcome.table.column("y").unwrap().null_count(), 0);
        assert!(catalog.read("p-60_mean-imputed").is_ok());
        assert!(!catalog.is_imputable("p-60_mean-imputed").unwrap());
    }

    #[test]
    fn test_impute_requires_imputable_source() {
        let mut catalog = catalog(DuplicatePolicy::Replace);
        let empty = df!["a" => [Some(1.0), None]].unwrap();
        catalog.write("readings", &empty).unwrap();

        let err = catalog
            .impute("readings", ImputationStrategy::Median, false)
            .unwrap_err();
        assert!(matches!(err, StudyError::NotImputable(_)));
    }
}
