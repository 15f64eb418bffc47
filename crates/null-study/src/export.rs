//! CSV import and export.

use crate::error::{Result, ResultExt};
use crate::store::validate_table_name;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `table` to `<dir>/<name>.csv` with a header row, creating `dir`.
pub fn export_csv(table: &DataFrame, dir: &Path, name: &str) -> Result<PathBuf> {
    validate_table_name(name)?;
    fs::create_dir_all(dir).context(format!("Creating {}", dir.display()))?;

    let path = dir.join(format!("{name}.csv"));
    let mut file = File::create(&path).context(format!("Creating {}", path.display()))?;
    let mut table = table.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut table)
        .context(format!("Writing {}", path.display()))?;

    info!("Exported '{}' to {}", name, path.display());
    Ok(path)
}

/// Load a CSV file with a header row, inferring column types.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10_000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Parsing {}", path.display()))?;

    info!("Loaded {} rows x {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}
