//! Input file discovery for `morsel process`.
//!
//! When no files are passed explicitly we read every `*.csv` directly inside
//! the data directory, except processed datasets (the configured canonical
//! path and the current output).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, EXIT_INPUT, EXIT_NO_DATA};

/// Resolve the raw input files: explicit paths are validated, otherwise the
/// data directory is scanned (deterministic order).
pub fn resolve_input_files(explicit: &[PathBuf], data_dir: &Path, exclude: &[&Path]) -> Result<Vec<PathBuf>, AppError> {
    if !explicit.is_empty() {
        return explicit.iter().map(|p| validate_csv_path(p)).collect();
    }

    if !data_dir.is_dir() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Data directory not found: {}", data_dir.display()),
        ));
    }

    let files = discover_csv_files(data_dir, exclude);
    if files.is_empty() {
        return Err(AppError::new(
            EXIT_NO_DATA,
            format!("No .csv files found in {}.", data_dir.display()),
        ));
    }
    Ok(files)
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("CSV file not found: {}", path.display()),
        ));
    }
    if path.is_dir() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Expected a .csv file (got: {}).", path.display()),
        ));
    }

    Ok(path.to_path_buf())
}

/// `*.csv` files directly under `dir`, sorted, skipping anything in `exclude`.
pub fn discover_csv_files(dir: &Path, exclude: &[&Path]) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut out: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| has_csv_extension(path))
        .filter(|path| !exclude.iter().any(|ex| same_file(path, ex)))
        .collect();
    out.sort();
    out
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        == Some(true)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        // `b` may not exist yet (first run); fall back to comparing names.
        _ => a.file_name() == b.file_name() && a.parent() == b.parent(),
    }
}
