//! CLI entry point for the null study tools.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use null_study::{
    Catalog, ImputationStrategy, OneHotMerge, ParquetStore, PurgeFlagSession, StructuralEdit,
    StudyConfig, analyze_nulls, export_csv, load_csv,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// CLI-compatible imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliStrategy {
    /// Fill with the column mean
    Mean,
    /// Fill with the column median
    Median,
    /// Fill with the most frequent value
    MostFrequent,
    /// Fill with the mean of the k nearest rows
    Knn,
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Study and mitigate missing values in sensor tables",
    long_about = "Analyze null distributions, derive purged/flagged tables and impute the rest.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  NULL_STUDY_DATA_DIR    Directory holding the table store (.env supported)\n\n\
                  EXAMPLES:\n  \
                  # Seed the root table\n  \
                  null-study import readings.csv\n\n  \
                  # Drop columns more than 60% null, then flag 'wind'\n  \
                  null-study pf --edit purge-per:60 --edit flag:wind\n\n  \
                  # Impute the derived table with 3 nearest neighbors\n  \
                  null-study impute p-60_f-wind knn --k 3"
)]
struct Args {
    /// Directory holding the table store
    #[arg(long, env = "NULL_STUDY_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Null count, null percentage and type of every column
    Analyze {
        table: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored tables
    List {
        /// Only tables that can be imputed
        #[arg(long)]
        imputable: bool,
    },

    /// Purge/flag session: apply edits in order and store the result
    ///
    /// Edits: purge:COL, purge-per:PCT (drop columns more than PCT% null),
    /// flag:COL, flag-per:PCT (flag columns more than PCT% null).
    Pf {
        /// Source table (defaults to the root table)
        #[arg(long)]
        source: Option<String>,

        /// Edit to apply; repeat for several
        #[arg(short, long = "edit", required = true)]
        edits: Vec<String>,
    },

    /// Impute an imputable table and store the result
    Impute {
        table: String,

        #[arg(value_enum)]
        strategy: CliStrategy,

        /// Number of neighbors for KNN
        #[arg(long, allow_hyphen_values = true)]
        k: Option<i64>,

        /// Also impute a one-hot encoding of the categorical columns
        #[arg(long)]
        one_hot: bool,

        /// Emit the imputed one-hot indicators instead of the original categorical columns
        #[arg(long, requires = "one_hot")]
        merge_one_hot: bool,
    },

    /// Write a table to CSV
    Export {
        table: String,

        /// Output directory (defaults to csv_output)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Load a CSV file into the store
    Import {
        csv: PathBuf,

        /// Table name (defaults to the root table)
        #[arg(long)]
        name: Option<String>,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Before parsing so NULL_STUDY_DATA_DIR can come from .env
    dotenv().ok();

    let args = Args::parse();

    let json_output = matches!(args.command, Command::Analyze { json: true, .. });
    init_logging(&args.log_level, args.quiet, json_output);

    let mut builder = StudyConfig::builder();
    if let Command::Impute {
        merge_one_hot: true,
        ..
    } = &args.command
    {
        builder = builder.one_hot_merge(OneHotMerge::Replace);
    }
    let config = builder.build()?;

    let store = ParquetStore::open(&args.data_dir)?;
    let mut catalog = Catalog::new(store, config);

    match args.command {
        Command::Analyze { table, json } => run_analyze(&catalog, &table, json),
        Command::List { imputable } => run_list(&catalog, imputable),
        Command::Pf { source, edits } => run_purge_flag(&mut catalog, source, &edits),
        Command::Impute {
            table,
            strategy,
            k,
            one_hot,
            ..
        } => run_impute(&mut catalog, &table, strategy, k, one_hot),
        Command::Export { table, out } => {
            let df = catalog.read(&table)?;
            let dir = out.unwrap_or_else(|| catalog.config().export_dir.clone());
            let path = export_csv(&df, &dir, &table)?;
            println!("Exported {} rows to {}", df.height(), path.display());
            Ok(())
        }
        Command::Import { csv, name } => {
            if !csv.exists() {
                return Err(anyhow!("Input file not found: {}", csv.display()));
            }
            let name = name.unwrap_or_else(|| catalog.config().root_table.clone());
            let df = load_csv(&csv)?;
            catalog.write(&name, &df)?;
            println!("Imported '{}': {} rows x {} columns", name, df.height(), df.width());
            Ok(())
        }
    }
}

/// Print the null report.
///
/// Uses `println!` for user-facing output so it shows regardless of log level.
fn run_analyze(catalog: &Catalog<ParquetStore>, table: &str, json: bool) -> Result<()> {
    let df = catalog.read(table)?;
    let summaries = analyze_nulls(&df);

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(72));
    println!("NULL ANALYSIS - {} ({} rows)", table, df.height());
    println!("{}", "=".repeat(72));
    println!(
        "{:<24} {:>10} {:>10} {:<14} {:<12}",
        "Column", "Nulls", "Null %", "Type", "Kind"
    );
    println!("{}", "-".repeat(72));

    for summary in &summaries {
        println!(
            "{:<24} {:>10} {:>10.2} {:<14} {:<12}",
            truncate_str(&summary.name, 23),
            summary.null_count,
            summary.null_percentage,
            truncate_str(&summary.dtype, 13),
            summary.kind.to_string()
        );
    }
    println!();
    Ok(())
}

fn run_list(catalog: &Catalog<ParquetStore>, imputable: bool) -> Result<()> {
    let names = if imputable {
        catalog.imputable_tables()?
    } else {
        catalog.list_tables()?
    };

    if names.is_empty() {
        println!("No tables found");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn run_purge_flag(
    catalog: &mut Catalog<ParquetStore>,
    source: Option<String>,
    edits: &[String],
) -> Result<()> {
    let source = source.unwrap_or_else(|| catalog.config().root_table.clone());
    let edits = edits
        .iter()
        .map(|e| e.parse::<StructuralEdit>())
        .collect::<null_study::StudyResult<Vec<_>>>()?;

    let table = catalog.read(&source)?;
    info!("Starting purge/flag session on '{}' {:?}", source, table.shape());

    let outcome = PurgeFlagSession::new(&table).apply_all(edits)?.finish();
    match catalog.materialize(outcome)? {
        Some(name) => println!("Created imputable table '{name}'"),
        None => println!("No edits applied"),
    }
    Ok(())
}

fn run_impute(
    catalog: &mut Catalog<ParquetStore>,
    table: &str,
    strategy: CliStrategy,
    k: Option<i64>,
    one_hot: bool,
) -> Result<()> {
    let strategy = match strategy {
        CliStrategy::Mean => ImputationStrategy::Mean,
        CliStrategy::Median => ImputationStrategy::Median,
        CliStrategy::MostFrequent => ImputationStrategy::MostFrequent,
        CliStrategy::Knn => {
            ImputationStrategy::knn(k.unwrap_or(catalog.config().knn_neighbors as i64))?
        }
    };
    if k.is_some() && !matches!(strategy, ImputationStrategy::Knn { .. }) {
        warn!("--k only applies to knn; ignoring it");
    }

    let imputed = catalog.impute(table, strategy, one_hot)?;
    for warning in &imputed.outcome.warnings {
        warn!("{}", warning);
    }
    println!(
        "Created '{}' ({} rows x {} columns, {} warnings)",
        imputed.name,
        imputed.outcome.table.height(),
        imputed.outcome.table.width(),
        imputed.outcome.warnings.len()
    );
    Ok(())
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
