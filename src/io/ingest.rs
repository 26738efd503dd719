//! Raw transaction CSV ingest.
//!
//! This module turns one or more raw sales exports into `RawTransaction`s.
//!
//! Design goals:
//! - **Strict schema** for required columns (a missing column or cell fails the load)
//! - **Lenient numerics**: unreadable `price` / `quantity` values become zero and are counted
//! - **Deterministic behavior**: files are concatenated in the order given, no dedup
//! - **Separation of concerns**: no product filtering or aggregation here

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::RawTransaction;
use crate::error::IngestError;
use crate::io::fields::{self, HeaderMap};

const REQUIRED_COLUMNS: [&str; 5] = ["product", "price", "quantity", "date", "region"];

/// What happened while reading raw files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub files: Vec<PathBuf>,
    pub rows_read: usize,
    pub price_fallbacks: usize,
    pub quantity_fallbacks: usize,
}

impl IngestReport {
    fn absorb(&mut self, other: IngestReport) {
        self.files.extend(other.files);
        self.rows_read += other.rows_read;
        self.price_fallbacks += other.price_fallbacks;
        self.quantity_fallbacks += other.quantity_fallbacks;
    }
}

/// Read and concatenate every file, in order.
pub fn read_raw_files(paths: &[PathBuf]) -> Result<(Vec<RawTransaction>, IngestReport), IngestError> {
    let mut rows = Vec::new();
    let mut report = IngestReport::default();
    for path in paths {
        let file_report = read_raw_file(path, &mut rows)?;
        report.absorb(file_report);
    }
    info!(
        files = report.files.len(),
        rows = report.rows_read,
        "read raw transaction files"
    );
    Ok((rows, report))
}

/// Read one raw CSV file, appending its rows to `out`.
pub fn read_raw_file(path: &Path, out: &mut Vec<RawTransaction>) -> Result<IngestReport, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let report = read_raw(path, file, out)?;
    if report.price_fallbacks > 0 || report.quantity_fallbacks > 0 {
        warn!(
            file = %path.display(),
            price = report.price_fallbacks,
            quantity = report.quantity_fallbacks,
            "unreadable numeric values were treated as zero"
        );
    }
    Ok(report)
}

/// Read raw rows from any reader. `source` is only used for error messages.
pub fn read_raw<R: std::io::Read>(
    source: &Path,
    reader: R,
    out: &mut Vec<RawTransaction>,
) -> Result<IngestReport, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| IngestError::csv(source, e))?.clone();
    let header_map = fields::build_header_map(&headers);
    if let Some(name) = fields::missing_column(&header_map, &REQUIRED_COLUMNS) {
        return Err(IngestError::malformed(
            source,
            None,
            format!("Missing required column: `{name}`"),
        ));
    }

    let mut report = IngestReport {
        files: vec![source.to_path_buf()],
        ..IngestReport::default()
    };

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| IngestError::csv(source, e))?;
        let row = parse_row(&record, &header_map, line, &mut report)
            .map_err(|reason| IngestError::malformed(source, Some(line), reason))?;
        out.push(row);
        report.rows_read += 1;
    }

    debug!(file = %source.display(), rows = report.rows_read, "parsed raw file");
    Ok(report)
}

fn parse_row(
    record: &StringRecord,
    header_map: &HeaderMap,
    line: usize,
    report: &mut IngestReport,
) -> Result<RawTransaction, String> {
    let product = fields::get_required(record, header_map, "product")?.to_string();
    let date = fields::parse_date(fields::get_required(record, header_map, "date")?)?;
    let region = fields::get_required(record, header_map, "region")?.to_string();

    let price_raw = fields::get_present(record, header_map, "price")?;
    let price = match fields::parse_money(price_raw) {
        Some(p) => p,
        None => {
            debug!(line, value = price_raw, "price fallback to zero");
            report.price_fallbacks += 1;
            Decimal::ZERO
        }
    };

    let quantity_raw = fields::get_present(record, header_map, "quantity")?;
    let quantity = match fields::parse_quantity(quantity_raw) {
        Some(q) => q,
        None => {
            debug!(line, value = quantity_raw, "quantity fallback to zero");
            report.quantity_fallbacks += 1;
            0
        }
    };

    Ok(RawTransaction {
        product,
        price,
        quantity,
        date,
        region,
    })
}
