//! Formatted terminal output for series and comparisons.
//!
//! We keep formatting code in one place so output changes are localized.

use rust_decimal::Decimal;

use super::PriceChangeComparison;
use crate::app::binding::SeriesView;
use crate::sales::series_total;

/// Aligned `Date  Sales` table with a total line.
pub fn format_series_table(view: &SeriesView) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", view.title));

    if view.is_empty() {
        out.push_str(&format!("No data to plot for region '{}'.\n", view.selector));
        return out;
    }

    let amounts: Vec<String> = view
        .points
        .iter()
        .map(|p| format_amount(p.total_amount))
        .collect();
    let total = format_amount(series_total(&view.points));
    let width = amounts
        .iter()
        .map(String::len)
        .chain([total.len(), "Sales".len()])
        .max()
        .unwrap_or(5);

    out.push_str(&format!("{:<10}  {:>width$}\n", "Date", "Sales"));
    for (p, amount) in view.points.iter().zip(&amounts) {
        let marker = if p.date == view.reference_date { "  <- price change" } else { "" };
        let date = p.date.format("%Y-%m-%d").to_string();
        out.push_str(&format!("{date:<10}  {amount:>width$}{marker}\n"));
    }
    out.push_str(&format!("{:<10}  {total:>width$}\n", "Total"));
    out.push_str(&format!("Days: {}\n", view.points.len()));
    out
}

pub fn format_comparison(cmp: &PriceChangeComparison) -> String {
    let avg = |v: Option<Decimal>| v.map(format_amount).unwrap_or_else(|| "-".to_string());

    let mut out = String::new();
    out.push_str(&format!("Price change: {}\n", cmp.reference_date));
    out.push_str(&format!(
        "  before: days={} total={} avg/day={}\n",
        cmp.before.days,
        format_amount(cmp.before.total),
        avg(cmp.before.daily_average()),
    ));
    out.push_str(&format!(
        "  after:  days={} total={} avg/day={}\n",
        cmp.after.days,
        format_amount(cmp.after.total),
        avg(cmp.after.daily_average()),
    ));

    let verdict = match cmp.average_change() {
        Some(d) if d > Decimal::ZERO => format!("Sales were higher after the price change (+{}/day).", format_amount(d)),
        Some(d) if d < Decimal::ZERO => format!("Sales were higher before the price change ({}/day).", format_amount(d)),
        Some(_) => "Average daily sales were unchanged.".to_string(),
        None => "Not enough data on both sides of the price change.".to_string(),
    };
    out.push_str(&verdict);
    out.push('\n');
    out
}

/// Two decimal places, no thousands separators.
pub fn format_amount(v: Decimal) -> String {
    format!("{:.2}", v.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RegionSelector, SeriesPoint};
    use crate::report::compare_around;
    use chrono::NaiveDate;

    fn view(points: Vec<SeriesPoint>) -> SeriesView {
        SeriesView {
            selector: RegionSelector::All,
            title: "Daily sales of pink morsel (total)".to_string(),
            points,
            reference_date: NaiveDate::from_ymd_opt(2021, 1, 15).unwrap(),
        }
    }

    fn pt(day: u32, amount: Decimal) -> SeriesPoint {
        SeriesPoint {
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            total_amount: amount,
        }
    }

    #[test]
    fn table_marks_reference_day() {
        let txt = format_series_table(&view(vec![
            pt(14, Decimal::from(150)),
            pt(15, Decimal::new(805, 1)),
        ]));
        let expected = concat!(
            "=== Daily sales of pink morsel (total) ===\n",
            "Date         Sales\n",
            "2021-01-14  150.00\n",
            "2021-01-15   80.50  <- price change\n",
            "Total       230.50\n",
            "Days: 2\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_table_says_no_data() {
        let txt = format_series_table(&view(Vec::new()));
        assert!(txt.contains("No data to plot for region 'All'."));
    }

    #[test]
    fn comparison_verdict() {
        let points = [pt(14, Decimal::from(10)), pt(16, Decimal::from(30))];
        let cmp = compare_around(&points, NaiveDate::from_ymd_opt(2021, 1, 15).unwrap());
        let txt = format_comparison(&cmp);
        assert!(txt.contains("before: days=1 total=10.00 avg/day=10.00"));
        assert!(txt.ends_with("Sales were higher after the price change (+20.00/day).\n"));
    }
}
