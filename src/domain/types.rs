//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held in memory for the lifetime of the process (`Dataset`)
//! - exported to JSON/CSV (`SeriesPoint`)
//! - passed between the query layer and any front-end

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product tracked by default. Matching is exact and case-sensitive.
pub const DEFAULT_TRACKED_PRODUCT: &str = "pink morsel";

/// Default data directory holding the raw input CSVs.
pub const DEFAULT_DATA_DIR: &str = "data";

/// File name of the canonical (processed) dataset inside the data directory.
pub const CANONICAL_FILE_NAME: &str = "processed_sales_data.csv";

/// The price-change date drawn as a vertical marker on every chart.
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 15).unwrap_or_default()
}

/// One raw transaction row after field coercion.
///
/// Numeric fields have already been through the lenient fallback (bad values
/// become zero); the date has been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub product: String,
    pub price: Decimal,
    pub quantity: i64,
    pub date: NaiveDate,
    pub region: String,
}

/// A normalized transaction: `amount = price * quantity` for the tracked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub date: NaiveDate,
    pub region: String,
    pub amount: Decimal,
}

/// The full in-memory dataset.
///
/// Built once, sorted by date (stable, so same-day records keep their input
/// order), and never mutated afterwards. Share it with `Arc<Dataset>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<CanonicalRecord>,
}

impl Dataset {
    pub fn from_records(mut records: Vec<CanonicalRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct regions observed in the dataset, sorted.
    pub fn regions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Sum of every record's amount, saturating at the `Decimal` bounds.
    pub fn total(&self) -> Decimal {
        crate::sales::aggregate::saturating_sum(self.records.iter().map(|r| r.amount))
    }

    /// First and last observed dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        let last = self.records.last()?.date;
        Some((first, last))
    }
}

/// One point of an aggregated daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub total_amount: Decimal,
}

/// Region filter for a query.
///
/// The exact string `"All"` selects every region. Anything else is taken as a
/// region name; an unknown region is not an error, it simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RegionSelector {
    #[default]
    All,
    Region(String),
}

impl RegionSelector {
    pub const ALL_LABEL: &'static str = "All";

    pub fn region(name: impl Into<String>) -> Self {
        RegionSelector::Region(name.into())
    }

    pub fn matches(&self, region: &str) -> bool {
        match self {
            RegionSelector::All => true,
            RegionSelector::Region(r) => r == region,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RegionSelector::All => Self::ALL_LABEL,
            RegionSelector::Region(r) => r,
        }
    }
}

impl fmt::Display for RegionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RegionSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl From<String> for RegionSelector {
    fn from(s: String) -> Self {
        if s == Self::ALL_LABEL {
            RegionSelector::All
        } else {
            RegionSelector::Region(s)
        }
    }
}

impl From<RegionSelector> for String {
    fn from(sel: RegionSelector) -> Self {
        match sel {
            RegionSelector::All => RegionSelector::ALL_LABEL.to_string(),
            RegionSelector::Region(r) => r,
        }
    }
}

/// Resolved runtime configuration.
///
/// Everything here is fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub tracked_product: String,
    pub reference_date: NaiveDate,
    pub data_dir: PathBuf,
    pub canonical_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            tracked_product: DEFAULT_TRACKED_PRODUCT.to_string(),
            reference_date: default_reference_date(),
            canonical_path: data_dir.join(CANONICAL_FILE_NAME),
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, region: &str, amount: i64) -> CanonicalRecord {
        CanonicalRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            region: region.to_string(),
            amount: Decimal::from(amount),
        }
    }

    #[test]
    fn selector_parses_all_case_sensitively() {
        assert_eq!("All".parse::<RegionSelector>().unwrap(), RegionSelector::All);
        assert_eq!(
            "all".parse::<RegionSelector>().unwrap(),
            RegionSelector::region("all")
        );
        assert_eq!(RegionSelector::region("north").to_string(), "north");
    }

    #[test]
    fn dataset_sort_is_stable_by_date() {
        let ds = Dataset::from_records(vec![
            rec("2021-01-16", "north", 1),
            rec("2021-01-14", "south", 2),
            rec("2021-01-14", "east", 3),
        ]);
        let regions: Vec<_> = ds.records().iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, ["south", "east", "north"]);
        assert_eq!(ds.regions(), ["east", "north", "south"]);
        assert_eq!(ds.total(), Decimal::from(6));
    }

    #[test]
    fn reference_date_is_price_change_day() {
        assert_eq!(default_reference_date().to_string(), "2021-01-15");
    }
}
