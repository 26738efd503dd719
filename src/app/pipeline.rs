//! Shared load/process logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! raw files -> ingest -> normalize -> canonical file -> `Arc<Dataset>`
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::domain::{AppConfig, Dataset};
use crate::error::{AppError, EXIT_NO_DATA};
use crate::io::canonical::{read_canonical, write_canonical};
use crate::io::ingest::{IngestReport, read_raw_files};
use crate::sales::normalize_dataset;

/// Result of `morsel process`.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub report: IngestReport,
    pub dataset: Dataset,
    pub output: PathBuf,
}

/// Ingest raw files, keep the tracked product, and write the canonical dataset.
pub fn process_files(files: &[PathBuf], output: &Path, config: &AppConfig) -> Result<ProcessOutput, AppError> {
    let (rows, report) = read_raw_files(files)?;
    let dataset = normalize_dataset(rows, &config.tracked_product)?;
    info!(
        rows = report.rows_read,
        kept = dataset.len(),
        product = %config.tracked_product,
        "normalized raw transactions"
    );

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::new(
                crate::error::EXIT_INPUT,
                format!("Failed to create output directory '{}': {e}", parent.display()),
            )
        })?;
    }
    write_canonical(output, &dataset)?;

    Ok(ProcessOutput {
        report,
        dataset,
        output: output.to_path_buf(),
    })
}

/// Load the canonical dataset once; the returned handle is shared read-only.
pub fn load_dataset(config: &AppConfig) -> Result<Arc<Dataset>, AppError> {
    let path = &config.canonical_path;
    if !path.exists() {
        return Err(AppError::new(
            EXIT_NO_DATA,
            format!(
                "Processed dataset not found: {}. Run `morsel process` first.",
                path.display()
            ),
        ));
    }
    let dataset = read_canonical(path)?;
    if let Some((first, last)) = dataset.date_range() {
        info!(records = dataset.len(), %first, %last, "dataset ready");
    }
    Ok(Arc::new(dataset))
}
