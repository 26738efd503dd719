//! Export an aggregated series to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::binding::SeriesView;
use crate::domain::SeriesPoint;
use crate::error::{AppError, EXIT_INPUT};

/// JSON document written by [`write_series_json`].
#[derive(Debug, Serialize)]
pub struct SeriesFile<'a> {
    pub tool: &'static str,
    pub product: &'a str,
    pub selector: &'a str,
    pub reference_date: NaiveDate,
    pub points: &'a [SeriesPoint],
}

/// Write a `Date,Sales` CSV.
pub fn write_series_csv(path: &Path, points: &[SeriesPoint]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series_csv_to(file, points)
}

pub fn write_series_csv_to<W: std::io::Write>(writer: W, points: &[SeriesPoint]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Date", "Sales"])
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV header: {e}")))?;
    for p in points {
        wtr.write_record([p.date.format("%Y-%m-%d").to_string(), p.total_amount.to_string()])
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write the view (selector, reference date, points) as pretty JSON.
pub fn write_series_json(path: &Path, view: &SeriesView, product: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create series JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &series_file(view, product))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write series JSON: {e}")))?;
    Ok(())
}

fn series_file<'a>(view: &'a SeriesView, product: &'a str) -> SeriesFile<'a> {
    SeriesFile {
        tool: "morsel",
        product,
        selector: view.selector.label(),
        reference_date: view.reference_date,
        points: &view.points,
    }
}
