//! Reporting utilities: the before/after price-change comparison.
//!
//! The point of the chart is to answer one question: were sales higher
//! before or after the price change? `compare_around` answers it numerically.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::SeriesPoint;

pub mod format;

pub use format::*;

/// Totals for the observed days on one side of the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodTotals {
    pub days: usize,
    pub total: Decimal,
}

impl PeriodTotals {
    /// Average per observed day; `None` when there are no days.
    pub fn daily_average(&self) -> Option<Decimal> {
        if self.days == 0 {
            return None;
        }
        Some(self.total / Decimal::from(self.days))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceChangeComparison {
    pub reference_date: NaiveDate,
    /// Dates strictly before the reference date.
    pub before: PeriodTotals,
    /// The reference date and everything after it.
    pub after: PeriodTotals,
}

impl PriceChangeComparison {
    /// Change in daily average (after minus before), when both sides have data.
    pub fn average_change(&self) -> Option<Decimal> {
        Some(self.after.daily_average()? - self.before.daily_average()?)
    }
}

pub fn compare_around(points: &[SeriesPoint], reference_date: NaiveDate) -> PriceChangeComparison {
    let mut before = PeriodTotals::default();
    let mut after = PeriodTotals::default();
    for p in points {
        let side = if p.date < reference_date { &mut before } else { &mut after };
        side.days += 1;
        side.total += p.total_amount;
    }
    PriceChangeComparison {
        reference_date,
        before,
        after,
    }
}
