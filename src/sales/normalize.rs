//! Record normalization: raw rows -> canonical `(date, region, amount)` records.

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{CanonicalRecord, Dataset, RawTransaction};
use crate::error::IngestError;

/// Keep rows for `tracked_product` (exact, case-sensitive match) and compute
/// `amount = price * quantity`.
///
/// The output order follows the input; use [`normalize_dataset`] for the
/// date-sorted `Dataset`. An amount that does not fit in a `Decimal` fails
/// the whole batch.
pub fn normalize<I>(rows: I, tracked_product: &str) -> Result<Vec<CanonicalRecord>, IngestError>
where
    I: IntoIterator<Item = RawTransaction>,
{
    let mut seen = 0usize;
    let out = rows
        .into_iter()
        .inspect(|_| seen += 1)
        .filter(|row| row.product == tracked_product)
        .map(|row| -> Result<CanonicalRecord, IngestError> {
            let amount = row
                .price
                .checked_mul(Decimal::from(row.quantity))
                .ok_or_else(|| IngestError::AmountOverflow {
                    date: row.date,
                    region: row.region.clone(),
                })?;
            Ok(CanonicalRecord {
                amount,
                date: row.date,
                region: row.region,
            })
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    debug!(rows = seen, kept = out.len(), product = tracked_product, "normalized rows");
    Ok(out)
}

pub fn normalize_dataset<I>(rows: I, tracked_product: &str) -> Result<Dataset, IngestError>
where
    I: IntoIterator<Item = RawTransaction>,
{
    normalize(rows, tracked_product).map(Dataset::from_records)
}
