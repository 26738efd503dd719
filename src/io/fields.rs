//! Field-level helpers shared by the CSV readers: header lookup, required
//! cells, date parsing, and the lenient numeric coercion.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub(crate) type HeaderMap = HashMap<String, usize>;

pub(crate) fn build_header_map(headers: &StringRecord) -> HeaderMap {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// First missing column out of `required`, if any.
pub(crate) fn missing_column<'a>(header_map: &HeaderMap, required: &[&'a str]) -> Option<&'a str> {
    required.iter().copied().find(|name| !header_map.contains_key(*name))
}

/// A cell that must be present and non-empty.
pub(crate) fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HeaderMap,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

/// A cell that must exist in the record but may be empty.
///
/// Used for numeric columns, where an empty cell goes through the zero
/// fallback rather than failing the load.
pub(crate) fn get_present<'a>(
    record: &'a StringRecord,
    header_map: &HeaderMap,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .ok_or_else(|| format!("Missing required field: `{name}`"))
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO first; the other formats show up in spreadsheet exports.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // `%.f` also matches when there is no fractional part.
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    // Zoned timestamps keep the calendar date of their own offset.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY, DD-MM-YYYY, or an ISO-8601 timestamp."
    ))
}

/// Parse a monetary value such as `3.00`, `$3.00` or `$1,250.50`.
///
/// Returns `None` when the value cannot be read; callers apply the zero
/// fallback and count it.
pub(crate) fn parse_money(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let cleaned: String = rest
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    Some(if negative { -value } else { value })
}

/// Parse an integer-like quantity (`5`, `5.0`). Fractional values are rejected.
pub(crate) fn parse_quantity(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(q) = s.parse::<i64>() {
        return Some(q);
    }
    let d = Decimal::from_str(s).ok()?;
    if d.fract().is_zero() { d.to_i64() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_accepts_dollar_and_commas() {
        assert_eq!(parse_money("$3.00"), Some(Decimal::new(300, 2)));
        assert_eq!(parse_money("1,250.50"), Some(Decimal::new(125050, 2)));
        assert_eq!(parse_money("-$2.5"), Some(Decimal::new(-25, 1)));
        assert_eq!(parse_money("bad"), None);
        assert_eq!(parse_money(""), None);
    }

    #[test]
    fn quantity_is_integer_like() {
        assert_eq!(parse_quantity("7"), Some(7));
        assert_eq!(parse_quantity(" 7.0 "), Some(7));
        assert_eq!(parse_quantity("7.5"), None);
        assert_eq!(parse_quantity("bad"), None);
    }

    #[test]
    fn dates_accept_iso_and_datetime() {
        let d = NaiveDate::from_ymd_opt(2021, 1, 14).unwrap();
        assert_eq!(parse_date("2021-01-14").unwrap(), d);
        assert_eq!(parse_date("14/01/2021").unwrap(), d);
        assert_eq!(parse_date("2021-01-14 00:00:00").unwrap(), d);
        assert_eq!(parse_date("2021-01-14T00:00:00").unwrap(), d);
        assert_eq!(parse_date("2021-01-14T00:00:00.000").unwrap(), d);
        assert_eq!(parse_date("2021-01-14 08:30:00.25").unwrap(), d);
        assert_eq!(parse_date("2021-01-14T00:00:00Z").unwrap(), d);
        assert_eq!(parse_date("2021-01-14T00:00:00+00:00").unwrap(), d);
        assert_eq!(parse_date("2021-01-14T23:30:00.5-05:00").unwrap(), d);
        assert!(parse_date("Jan 14").is_err());
        assert!(parse_date("2021-01-14T25:00:00Z").is_err());
    }

    #[test]
    fn header_names_are_normalized() {
        let headers = StringRecord::from(vec!["\u{feff}Product", " Price ", "QUANTITY"]);
        let map = build_header_map(&headers);
        assert_eq!(map.get("product"), Some(&0));
        assert_eq!(map.get("price"), Some(&1));
        assert_eq!(missing_column(&map, &["product", "date"]), Some("date"));
    }
}
