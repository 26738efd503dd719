//! Query layer: the single entry point front-ends call.
//!
//! Stateless; every call recomputes from the dataset.

use crate::domain::{Dataset, RegionSelector, SeriesPoint};

/// Daily series for `selector`.
pub fn query(dataset: &Dataset, selector: &RegionSelector) -> Vec<SeriesPoint> {
    super::aggregate::aggregate(dataset, selector)
}

/// Selector values a front-end should offer: `All` first, then every observed
/// region in sorted order.
pub fn selector_options(dataset: &Dataset) -> Vec<RegionSelector> {
    std::iter::once(RegionSelector::All)
        .chain(dataset.regions().into_iter().map(RegionSelector::Region))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalRecord;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn example_dataset() -> Dataset {
        let d = |day| NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
        Dataset::from_records(vec![
            CanonicalRecord { date: d(14), region: "north".into(), amount: Decimal::from(100) },
            CanonicalRecord { date: d(14), region: "south".into(), amount: Decimal::from(50) },
            CanonicalRecord { date: d(16), region: "north".into(), amount: Decimal::from(80) },
        ])
    }

    fn pairs(points: &[SeriesPoint]) -> Vec<(String, Decimal)> {
        points.iter().map(|p| (p.date.to_string(), p.total_amount)).collect()
    }

    #[test]
    fn worked_example() {
        let ds = example_dataset();

        assert_eq!(
            pairs(&query(&ds, &RegionSelector::All)),
            [("2021-01-14".to_string(), Decimal::from(150)), ("2021-01-16".to_string(), Decimal::from(80))]
        );
        assert_eq!(
            pairs(&query(&ds, &RegionSelector::region("north"))),
            [("2021-01-14".to_string(), Decimal::from(100)), ("2021-01-16".to_string(), Decimal::from(80))]
        );
        assert!(query(&ds, &RegionSelector::region("west")).is_empty());
    }

    #[test]
    fn repeated_queries_are_identical() {
        let ds = example_dataset();
        let sel = RegionSelector::region("north");
        assert_eq!(query(&ds, &sel), query(&ds, &sel));
    }

    #[test]
    fn concurrent_queries_need_no_locking() {
        let ds = Arc::new(example_dataset());
        let expected = query(&ds, &RegionSelector::All);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ds = Arc::clone(&ds);
                std::thread::spawn(move || query(&ds, &RegionSelector::All))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }

    #[test]
    fn options_start_with_all() {
        let opts = selector_options(&example_dataset());
        assert_eq!(
            opts,
            [RegionSelector::All, RegionSelector::region("north"), RegionSelector::region("south")]
        );
    }
}
