use super::TableStore;
use crate::error::{Result, StudyError};
use polars::prelude::DataFrame;
use std::collections::BTreeMap;

/// In-process table store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: BTreeMap<String, DataFrame>,
    imputables: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one table.
    pub fn with_table(mut self, name: &str, table: DataFrame) -> Result<Self> {
        self.write_table(name, &table)?;
        Ok(self)
    }
}

impl TableStore for MemoryStore {
    fn read_table(&self, name: &str) -> Result<DataFrame> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| StudyError::TableNotFound(name.to_string()))
    }

    fn write_table(&mut self, name: &str, table: &DataFrame) -> Result<()> {
        self.tables.insert(name.to_string(), table.clone());
        Ok(())
    }

    fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    fn list_table_names(&self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn register_imputable(&mut self, name: &str) -> Result<()> {
        if !self.imputables.iter().any(|n| n == name) {
            self.imputables.push(name.to_string());
        }
        Ok(())
    }

    fn imputables(&self) -> Result<Vec<String>> {
        Ok(self.imputables.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_round_trip() {
        let df = df!["a" => [1, 2, 3]].unwrap();
        let mut store = MemoryStore::new();
        store.write_table("aggregate", &df).unwrap();

        assert!(store.contains_table("aggregate"));
        assert!(store.read_table("aggregate").unwrap().equals(&df));
        assert_eq!(store.list_table_names().unwrap(), vec!["aggregate"]);
    }

    #[test]
    fn test_missing_table() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.read_table("nope").unwrap_err(),
            StudyError::TableNotFound(_)
        ));
    }

    #[test]
    fn test_registry_is_append_only_set() {
        let mut store = MemoryStore::new();
        store.register_imputable("p-x").unwrap();
        store.register_imputable("f-y").unwrap();
        store.register_imputable("p-x").unwrap();
        assert_eq!(store.imputables().unwrap(), vec!["p-x", "f-y"]);
    }

    #[test]
    fn test_any_name_is_a_valid_key() {
        let df = df!["a" => [1]].unwrap();
        let mut store = MemoryStore::new();
        store.write_table("p-Air Temp", &df).unwrap();
        assert!(store.contains_table("p-Air Temp"));
    }
}
