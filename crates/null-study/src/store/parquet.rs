use super::{TableStore, validate_table_name};
use crate::error::{Result, ResultExt, StudyError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const REGISTRY_FILE: &str = "imputables.json";
const TABLE_EXTENSION: &str = "parquet";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Registry {
    names: Vec<String>,
}

/// Directory-backed store: `<dir>/<name>.parquet` per table.
#[derive(Debug, Clone)]
pub struct ParquetStore {
    root: PathBuf,
}

impl ParquetStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).context(format!("Creating {}", root.display()))?;
        debug!("Opened table store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{TABLE_EXTENSION}"))
    }

    fn registry_path(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    fn load_registry(&self) -> Result<Registry> {
        let path = self.registry_path();
        if !path.exists() {
            return Ok(Registry::default());
        }
        let file = File::open(&path).context(format!("Opening {}", path.display()))?;
        Ok(serde_json::from_reader(file)?)
    }

    fn save_registry(&self, registry: &Registry) -> Result<()> {
        let path = self.registry_path();
        let file = File::create(&path).context(format!("Writing {}", path.display()))?;
        serde_json::to_writer_pretty(file, registry)?;
        Ok(())
    }
}

impl TableStore for ParquetStore {
    fn read_table(&self, name: &str) -> Result<DataFrame> {
        validate_table_name(name)?;
        let path = self.table_path(name);
        if !path.exists() {
            return Err(StudyError::TableNotFound(name.to_string()));
        }

        let file = File::open(&path).context(format!("Opening {}", path.display()))?;
        let df = ParquetReader::new(file)
            .finish()
            .context(format!("Reading table '{name}'"))?;
        debug!("Read table '{}' {:?}", name, df.shape());
        Ok(df)
    }

    fn write_table(&mut self, name: &str, table: &DataFrame) -> Result<()> {
        validate_table_name(name)?;
        let path = self.table_path(name);
        let mut file = File::create(&path).context(format!("Creating {}", path.display()))?;

        let mut table = table.clone();
        ParquetWriter::new(&mut file)
            .finish(&mut table)
            .context(format!("Writing table '{name}'"))?;
        info!("Wrote table '{}' {:?} to {}", name, table.shape(), path.display());
        Ok(())
    }

    fn contains_table(&self, name: &str) -> bool {
        validate_table_name(name).is_ok() && self.table_path(name).exists()
    }

    fn list_table_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).context(format!("Listing {}", self.root.display()))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TABLE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn register_imputable(&mut self, name: &str) -> Result<()> {
        let mut registry = self.load_registry()?;
        if registry.names.iter().any(|n| n == name) {
            return Ok(());
        }
        registry.names.push(name.to_string());
        self.save_registry(&registry)
    }

    fn imputables(&self) -> Result<Vec<String>> {
        Ok(self.load_registry()?.names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn temp_store() -> ParquetStore {
        let dir = std::env::temp_dir().join(format!(
            "null-study-store-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = fs::remove_dir_all(&dir);
        ParquetStore::open(dir).unwrap()
    }

    #[test]
    fn test_round_trip_keeps_nulls() {
        let mut store = temp_store();
        let df = df![
            "station" => ["s1", "s2"],
            "temp" => [Some(1.5), None],
        ]
        .unwrap();

        store.write_table("aggregate", &df).unwrap();
        let back = store.read_table("aggregate").unwrap();
        assert!(back.equals_missing(&df));
        assert!(store.contains_table("aggregate"));

        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn test_listing_ignores_registry_file() {
        let mut store = temp_store();
        let df = df!["a" => [1]].unwrap();
        store.write_table("b-table", &df).unwrap();
        store.write_table("a-table", &df).unwrap();
        store.register_imputable("a-table").unwrap();

        assert_eq!(store.list_table_names().unwrap(), vec!["a-table", "b-table"]);

        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn test_registry_persists() {
        let mut store = temp_store();
        store.register_imputable("p-x").unwrap();
        store.register_imputable("p-x").unwrap();
        store.register_imputable("f-60").unwrap();

        let reopened = ParquetStore::open(store.root()).unwrap();
        assert_eq!(reopened.imputables().unwrap(), vec!["p-x", "f-60"]);

        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn test_missing_table() {
        let store = temp_store();
        assert!(matches!(
            store.read_table("aggregate").unwrap_err(),
            StudyError::TableNotFound(_)
        ));
        fs::remove_dir_all(store.root()).unwrap();
    }
}
