//! Command-line parsing for the pink morsel sales viewer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use crate::domain::{AppConfig, CANONICAL_FILE_NAME, DEFAULT_DATA_DIR, DEFAULT_TRACKED_PRODUCT, RegionSelector};

pub mod discover;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "morsel", version, about = "Daily pink morsel sales by region")]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct CommonArgs {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    pub log_level: LevelFilter,

    /// Directory holding the raw CSV exports and the processed dataset.
    #[arg(long, global = true, env = "MORSEL_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Product to keep during processing (exact, case-sensitive).
    #[arg(long, global = true, env = "MORSEL_PRODUCT", default_value = DEFAULT_TRACKED_PRODUCT)]
    pub product: String,

    /// Date drawn as the price-change marker (YYYY-MM-DD).
    #[arg(long, global = true, env = "MORSEL_REFERENCE_DATE", default_value = "2021-01-15")]
    pub reference_date: NaiveDate,

    /// Processed dataset path. Defaults to `<data-dir>/processed_sales_data.csv`.
    #[arg(long, global = true, env = "MORSEL_DATASET")]
    pub dataset: Option<PathBuf>,
}

impl CommonArgs {
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            tracked_product: self.product.clone(),
            reference_date: self.reference_date,
            canonical_path: self
                .dataset
                .clone()
                .unwrap_or_else(|| self.data_dir.join(CANONICAL_FILE_NAME)),
            data_dir: self.data_dir.clone(),
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize raw transaction CSVs into the processed `Sales,Date,Region` dataset.
    Process(ProcessArgs),
    /// Print the daily series for a region, optionally plotting/exporting it.
    Query(QueryArgs),
    /// List the selectable regions.
    Regions,
    /// Launch the interactive TUI.
    Tui(TuiArgs),
}

/// Options for `morsel process`.
#[derive(Debug, Parser, Clone)]
pub struct ProcessArgs {
    /// Raw CSV files to read. Defaults to every `*.csv` in the data directory.
    #[arg(value_name = "CSV")]
    pub files: Vec<PathBuf>,

    /// Where to write the processed dataset (overrides `--dataset`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Options for `morsel query`.
#[derive(Debug, Parser, Clone)]
pub struct QueryArgs {
    /// Region to show, or `All`.
    #[arg(short = 'r', long, default_value = RegionSelector::ALL_LABEL)]
    pub region: RegionSelector,

    /// Render an ASCII plot below the table.
    #[arg(long)]
    pub plot: bool,

    /// Print before/after totals around the reference date.
    #[arg(long)]
    pub compare: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the series to JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Options for `morsel tui`.
#[derive(Debug, Parser, Clone, Default)]
pub struct TuiArgs {
    /// Region selected at start-up.
    #[arg(short = 'r', long, default_value = RegionSelector::ALL_LABEL)]
    pub region: RegionSelector,
}
