//! Read/write the canonical dataset file.
//!
//! The canonical file is the boundary artifact between `morsel process` and
//! every other command: exactly three columns, `Sales,Date,Region`, sorted by
//! date ascending.

use std::fs::File;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::{CanonicalRecord, Dataset};
use crate::error::IngestError;
use crate::io::fields;

pub const CANONICAL_HEADERS: [&str; 3] = ["Sales", "Date", "Region"];

/// Write the dataset in its current (date-sorted) order.
pub fn write_canonical(path: &Path, dataset: &Dataset) -> Result<(), IngestError> {
    let file = File::create(path).map_err(|e| IngestError::io(path, e))?;
    write_canonical_to(path, file, dataset)?;
    info!(path = %path.display(), records = dataset.len(), "wrote canonical dataset");
    Ok(())
}

pub fn write_canonical_to<W: std::io::Write>(
    path: &Path,
    writer: W,
    dataset: &Dataset,
) -> Result<(), IngestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CANONICAL_HEADERS)
        .map_err(|e| IngestError::csv(path, e))?;
    for r in dataset.records() {
        let date = r.date.format("%Y-%m-%d").to_string();
        wtr.write_record([r.amount.to_string().as_str(), date.as_str(), r.region.as_str()])
            .map_err(|e| IngestError::csv(path, e))?;
    }
    wtr.flush().map_err(|e| IngestError::io(path, e))?;
    Ok(())
}

/// Load the canonical file into an immutable `Dataset`.
pub fn read_canonical(path: &Path) -> Result<Dataset, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let dataset = read_canonical_from(path, file)?;
    info!(path = %path.display(), records = dataset.len(), "loaded canonical dataset");
    Ok(dataset)
}

pub fn read_canonical_from<R: std::io::Read>(source: &Path, reader: R) -> Result<Dataset, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| IngestError::csv(source, e))?.clone();
    let header_map = fields::build_header_map(&headers);
    if let Some(name) = fields::missing_column(&header_map, &["sales", "date", "region"]) {
        return Err(IngestError::malformed(
            source,
            None,
            format!("Missing required column: `{name}`"),
        ));
    }

    let mut records = Vec::new();
    let mut sales_fallbacks = 0usize;
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| IngestError::csv(source, e))?;
        let malformed = |reason: String| IngestError::malformed(source, Some(line), reason);

        let date = fields::get_required(&record, &header_map, "date")
            .and_then(fields::parse_date)
            .map_err(malformed)?;
        let region = fields::get_required(&record, &header_map, "region")
            .map_err(malformed)?
            .to_string();
        let sales_raw = fields::get_present(&record, &header_map, "sales").map_err(malformed)?;
        let amount = fields::parse_money(sales_raw).unwrap_or_else(|| {
            debug!(line, value = sales_raw, "sales fallback to zero");
            sales_fallbacks += 1;
            Decimal::ZERO
        });

        records.push(CanonicalRecord { date, region, amount });
    }

    if sales_fallbacks > 0 {
        warn!(
            file = %source.display(),
            count = sales_fallbacks,
            "unreadable Sales values were treated as zero"
        );
    }

    Ok(Dataset::from_records(records))
}
