//! Daily aggregation: filter by region, group by date, sum amounts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{Dataset, RegionSelector, SeriesPoint};

/// Sum amounts per date for the records matching `selector`.
///
/// Points come back in ascending date order, one per observed date. Dates with
/// no matching records are absent rather than zero. Sums saturate at
/// `Decimal::MAX` / `Decimal::MIN`.
pub fn aggregate(dataset: &Dataset, selector: &RegionSelector) -> Vec<SeriesPoint> {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in dataset.records().iter().filter(|r| selector.matches(&r.region)) {
        let total = by_date.entry(record.date).or_insert(Decimal::ZERO);
        *total = total.saturating_add(record.amount);
    }

    by_date
        .into_iter()
        .map(|(date, total_amount)| SeriesPoint { date, total_amount })
        .collect()
}

/// Sum of a series, saturating like [`aggregate`].
pub fn series_total(points: &[SeriesPoint]) -> Decimal {
    saturating_sum(points.iter().map(|p| p.total_amount))
}

pub(crate) fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}
