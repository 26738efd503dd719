//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - processes raw files or loads the processed dataset
//! - prints tables/plots, writes exports, or runs the TUI

use clap::Parser;
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::app::binding::SalesBinding;
use crate::cli::{Cli, Command, ProcessArgs, QueryArgs, TuiArgs};
use crate::domain::AppConfig;
use crate::error::AppError;

pub mod binding;
pub mod pipeline;

/// Entry point for the `morsel` binary.
pub fn run() -> Result<(), AppError> {
    // Values in `.env` act as defaults for the `MORSEL_*` variables clap reads.
    dotenvy::dotenv().ok();

    // We want `morsel` and `morsel --data-dir x` to behave like `morsel tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let is_tui = matches!(cli.command, Command::Tui(_));
    init_logger(cli.common.log_level, is_tui);
    trace!("{cli:?}");

    let config = cli.common.to_config();
    debug!(?config, "resolved configuration");

    match cli.command {
        Command::Process(args) => handle_process(args, &config),
        Command::Query(args) => handle_query(args, &config),
        Command::Regions => handle_regions(&config),
        Command::Tui(args) => handle_tui(args, &config),
    }
}

fn handle_process(args: ProcessArgs, config: &AppConfig) -> Result<(), AppError> {
    let output = args.output.clone().unwrap_or_else(|| config.canonical_path.clone());
    // Processed files are never raw input.
    let exclude = [config.canonical_path.as_path(), output.as_path()];
    let files = crate::cli::discover::resolve_input_files(&args.files, &config.data_dir, &exclude)?;
    let out = pipeline::process_files(&files, &output, config)?;

    println!(
        "Processed {} row(s) from {} file(s); kept {} '{}' record(s).",
        out.report.rows_read,
        out.report.files.len(),
        out.dataset.len(),
        config.tracked_product,
    );
    if out.report.price_fallbacks > 0 || out.report.quantity_fallbacks > 0 {
        println!(
            "Treated as zero: {} unreadable price value(s), {} unreadable quantity value(s).",
            out.report.price_fallbacks, out.report.quantity_fallbacks,
        );
    }
    println!("Saved to: {}", out.output.display());
    Ok(())
}

fn handle_query(args: QueryArgs, config: &AppConfig) -> Result<(), AppError> {
    let dataset = pipeline::load_dataset(config)?;
    let mut binding = SalesBinding::new(dataset, config);
    let view = binding.recompute(args.region.clone()).clone();

    println!("{}", crate::report::format_series_table(&view));

    if args.compare {
        let cmp = crate::report::compare_around(&view.points, view.reference_date);
        println!("{}", crate::report::format_comparison(&cmp));
    }

    if args.plot {
        let plot = crate::plot::render_series_plot(&view.points, view.reference_date, args.width, args.height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_series_csv(path, &view.points)?;
        info!(path = %path.display(), "exported series CSV");
    }
    if let Some(path) = &args.json {
        crate::io::export::write_series_json(path, &view, &config.tracked_product)?;
        info!(path = %path.display(), "exported series JSON");
    }

    Ok(())
}

fn handle_regions(config: &AppConfig) -> Result<(), AppError> {
    let dataset = pipeline::load_dataset(config)?;
    for option in crate::sales::selector_options(&dataset) {
        println!("{option}");
    }
    Ok(())
}

fn handle_tui(args: TuiArgs, config: &AppConfig) -> Result<(), AppError> {
    let dataset = pipeline::load_dataset(config)?;
    crate::tui::run(dataset, config, args.region)
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr, except in TUI mode where they would be drawn over the
/// alternate screen; there they are discarded.
pub fn init_logger(level: LevelFilter, discard: bool) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // RUST_LOG does not exist; use the requested level for this crate and the binary only.
        None => EnvFilter::new(format!("{}={level},morsel={level}", env!("CARGO_CRATE_NAME"))),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if discard {
        builder.with_writer(std::io::sink).try_init()
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };
    // A subscriber may already be installed (e.g. by a test harness).
    let _ = result;
}

/// Rewrite argv so `morsel` defaults to `morsel tui`.
///
/// Rules:
/// - `morsel`                       -> `morsel tui`
/// - `morsel --data-dir d ...`      -> `morsel tui --data-dir d ...`
/// - `morsel --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "process" | "query" | "regions" | "tui");
    if is_subcommand {
        return argv;
    }

    // Leading global flags: treat as "tui flags" unless a subcommand follows later.
    if arg1.starts_with('-') {
        let has_subcommand = argv
            .iter()
            .skip(2)
            .any(|a| matches!(a.as_str(), "process" | "query" | "regions" | "tui"));
        if !has_subcommand {
            argv.insert(1, "tui".to_string());
        }
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
