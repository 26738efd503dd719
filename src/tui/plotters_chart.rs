//! Plotters-powered daily sales chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call (see `ChartState`).
pub struct SalesPlottersChart<'a> {
    /// Daily totals as `(day number since CE, sales)`.
    pub line: &'a [(f64, f64)],
    /// X position of the price-change marker, when inside `x_bounds`.
    pub marker_x: Option<f64>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub y_label: &'a str,
}

impl<'a> Widget for SalesPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_day_number(*v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            let marker_color = RGBColor(255, 255, 0); // yellow

            // 1) Price-change marker, drawn first so the sales line stays on top.
            if let Some(mx) = self.marker_x {
                chart.draw_series(LineSeries::new([(mx, y0), (mx, y1)], &marker_color))?;
            }

            // 2) Daily sales line.
            chart.draw_series(LineSeries::new(self.line.iter().copied(), &line_color))?;

            // 3) A single day has no line segment; mark it.
            if self.line.len() == 1 {
                chart.draw_series(self.line.iter().map(|&(x, y)| Pixel::new((x, y), line_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

pub fn day_number(date: NaiveDate) -> f64 {
    use chrono::Datelike;
    f64::from(date.num_days_from_ce())
}

pub fn fmt_day_number(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_numbers_round_trip_through_labels() {
        let d = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
        assert_eq!(fmt_day_number(day_number(d)), "2021-01-15");
        assert_eq!(fmt_day_number(day_number(d) + 0.4), "2021-01-15");
    }
}
