//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed days: `o`
//! - connecting line: `.`
//! - reference date marker: `|`

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::SeriesPoint;

/// Render a daily series with a vertical marker on `reference_date`.
pub fn render_series_plot(points: &[SeriesPoint], reference_date: NaiveDate, width: usize, height: usize) -> String {
    if points.is_empty() {
        return "No data to plot.\n".to_string();
    }

    let width = width.max(10);
    let height = height.max(5);

    let xy: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (day_number(p.date), p.total_amount.to_f64().unwrap_or(0.0)))
        .collect();

    let (t_min, t_max) = x_range(&xy);
    let (y_min, y_max) = y_range(&xy);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first, then points, then the marker in whatever cells are still empty.
    draw_polyline(&mut grid, &xy, t_min, t_max, y_min, y_max);
    for &(t, y) in &xy {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        grid[yy][x] = 'o';
    }

    let ref_t = day_number(reference_date);
    let marker_visible = ref_t >= t_min && ref_t <= t_max;
    if marker_visible {
        let x = map_x(ref_t, t_min, t_max, width);
        for row in grid.iter_mut() {
            if row[x] == ' ' {
                row[x] = '|';
            }
        }
    }

    let first = points[0].date;
    let last = points[points.len() - 1].date;

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: date=[{first}, {last}] | sales=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    if marker_visible {
        out.push_str(&format!("| price change {reference_date}\n"));
    } else {
        out.push_str(&format!("(price change {reference_date} outside plotted range)\n"));
    }
    out
}

fn day_number(date: NaiveDate) -> f64 {
    use chrono::Datelike;
    date.num_days_from_ce() as f64
}

fn x_range(xy: &[(f64, f64)]) -> (f64, f64) {
    let min_t = xy.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_t = xy.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if max_t > min_t {
        (min_t, max_t)
    } else {
        // Single day: center it.
        (min_t - 1.0, min_t + 1.0)
    }
}

fn y_range(xy: &[(f64, f64)]) -> (f64, f64) {
    let min_y = xy.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = xy.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        (min_y, max_y)
    } else if min_y.is_finite() {
        (min_y - 1.0, min_y + 1.0)
    } else {
        (0.0, 1.0)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], xy: &[(f64, f64)], t_min: f64, t_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in xy {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '.');
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn pt(day: u32, amount: i64) -> SeriesPoint {
        SeriesPoint {
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            total_amount: Decimal::from(amount),
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let points = [pt(14, 100), pt(16, 200)];
        let reference = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
        let txt = render_series_plot(&points, reference, 11, 5);
        let expected = concat!(
            "Plot: date=[2021-01-14, 2021-01-16] | sales=[95.00, 205.00]\n",
            "     |   .o\n",
            "     | ..  \n",
            "    ...    \n",
            "  .. |     \n",
            "o.   |     \n",
            "| price change 2021-01-15\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_has_no_plot() {
        let reference = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
        assert_eq!(render_series_plot(&[], reference, 40, 10), "No data to plot.\n");
    }

    #[test]
    fn marker_outside_range_is_noted() {
        let points = [pt(1, 5), pt(3, 7)];
        let reference = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
        let txt = render_series_plot(&points, reference, 20, 6);
        assert!(txt.lines().skip(1).take(6).all(|row| !row.contains('|')));
        assert!(txt.ends_with("(price change 2021-01-15 outside plotted range)\n"));
    }

    #[test]
    fn single_point_is_centered() {
        let reference = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
        let txt = render_series_plot(&[pt(15, 10)], reference, 11, 5);
        let rows: Vec<&str> = txt.lines().skip(1).take(5).collect();
        assert_eq!(rows[2], "     o     ");
        assert_eq!(rows[0], "     |     ");
    }
}
