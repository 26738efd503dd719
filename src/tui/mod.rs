//! Ratatui-based terminal UI.
//!
//! Left: the region selector (`All` plus every observed region). Right: the
//! daily sales line chart with the price-change marker. Every selection
//! change goes through `SalesBinding`, which recomputes the series and hands it
//! to `ChartState` before the next key is read.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use rust_decimal::prelude::ToPrimitive;
use tracing::info;

use crate::app::binding::{SalesBinding, SeriesRenderer, SeriesView};
use crate::domain::{AppConfig, Dataset, RegionSelector};
use crate::error::{AppError, EXIT_UI};
use crate::report::{compare_around, format_amount};

mod plotters_chart;

use plotters_chart::{SalesPlottersChart, day_number};

/// Start the TUI on an already-loaded dataset.
pub fn run(dataset: Arc<Dataset>, config: &AppConfig, initial: RegionSelector) -> Result<(), AppError> {
    let mut app = App::new(dataset, config, initial)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::new(EXIT_UI, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_UI, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_UI, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Plot-ready copy of the latest `SeriesView`.
#[derive(Debug, Clone, Default)]
struct ChartState {
    view: Option<SeriesView>,
    line: Vec<(f64, f64)>,
    marker_x: Option<f64>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl SeriesRenderer for ChartState {
    fn render(&mut self, view: &SeriesView) -> Result<(), AppError> {
        self.line = view
            .points
            .iter()
            .map(|p| (day_number(p.date), p.total_amount.to_f64().unwrap_or(0.0)))
            .collect();

        let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in &self.line {
            x0 = x0.min(x);
            x1 = x1.max(x);
            y0 = y0.min(y);
            y1 = y1.max(y);
        }

        // Keep the marker in frame even when the data sits on one side of it.
        let mx = day_number(view.reference_date);
        if x0.is_finite() && x1.is_finite() {
            x0 = x0.min(mx);
            x1 = x1.max(mx);
        }
        if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
            x0 = mx - 1.0;
            x1 = mx + 1.0;
        }
        if !y0.is_finite() || !y1.is_finite() || y1 <= y0 {
            let base = if y0.is_finite() { y0 } else { 0.0 };
            y0 = base - 1.0;
            y1 = base + 1.0;
        }
        let pad = ((y1 - y0).abs() * 0.05).max(1e-12);

        self.x_bounds = [x0, x1];
        self.y_bounds = [y0 - pad, y1 + pad];
        self.marker_x = Some(mx);
        self.view = Some(view.clone());
        Ok(())
    }
}

struct App {
    binding: SalesBinding,
    chart: ChartState,
    selected: usize,
    export_dir: PathBuf,
    status: String,
}

impl App {
    fn new(dataset: Arc<Dataset>, config: &AppConfig, initial: RegionSelector) -> Result<Self, AppError> {
        let mut binding = SalesBinding::new(dataset, config);
        let mut chart = ChartState::default();
        binding.select(initial, &mut chart)?;
        let selected = binding.current_index().unwrap_or(0);
        let export_dir = config
            .canonical_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| config.data_dir.clone());

        let status = match binding.current_index() {
            Some(_) => format!("{} records loaded", binding.dataset().len()),
            None => format!("region '{}' not found; showing no data", binding.current().selector),
        };
        Ok(Self {
            binding,
            chart,
            selected,
            export_dir,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_UI, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_UI, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_UI, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.apply_selection(self.selected - 1)?;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.binding.options().len() {
                    self.apply_selection(self.selected + 1)?;
                }
            }
            KeyCode::Home => self.apply_selection(0)?,
            KeyCode::Char('e') => self.export_current(),
            _ => {}
        }
        Ok(false)
    }

    fn apply_selection(&mut self, index: usize) -> Result<(), AppError> {
        let view = self.binding.select_index(index, &mut self.chart)?;
        self.status = format!("region: {} ({} days)", view.selector, view.points.len());
        self.selected = self.binding.current_index().unwrap_or(index);
        Ok(())
    }

    fn export_current(&mut self) {
        let view = self.binding.current();
        let file_name = format!("series_{}.csv", view.selector.label().replace(['/', '\\', ' '], "_"));
        let path = self.export_dir.join(file_name);
        self.status = match crate::io::export::write_series_csv(&path, &view.points) {
            Ok(()) => {
                info!(path = %path.display(), "exported series");
                format!("Wrote {}", path.display())
            }
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view = self.binding.current();
        let cmp = compare_around(&view.points, view.reference_date);
        let avg = |v: Option<rust_decimal::Decimal>| v.map(format_amount).unwrap_or_else(|| "-".to_string());

        let lines = vec![
            Line::from(vec![
                Span::styled("morsel", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {}", view.title)),
            ]),
            Line::from(Span::styled(
                format!(
                    "price change: {} | avg/day before: {} | after: {}",
                    view.reference_date,
                    avg(cmp.before.daily_average()),
                    avg(cmp.after.daily_average()),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(20), Constraint::Min(0)])
            .split(area);

        self.draw_selector(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_selector(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .binding
            .options()
            .iter()
            .map(|o| ListItem::new(o.label().to_string()))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Region").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        // No highlight while showing a region that is not in the list.
        let mut state = ListState::default();
        state.select(self.binding.current_index());
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .chart
            .view
            .as_ref()
            .map(|v| v.title.clone())
            .unwrap_or_else(|| "Daily sales".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.chart.line.is_empty() {
            let msg = Paragraph::new("No data to plot for this region.")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            frame.render_widget(msg, inner);
            return;
        }

        let widget = SalesPlottersChart {
            line: &self.chart.line,
            marker_x: self.chart.marker_x,
            x_bounds: self.chart.x_bounds,
            y_bounds: self.chart.y_bounds,
            y_label: "sales",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ region  e export csv  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalRecord;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn app() -> App {
        let d = |day| NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
        let ds = Dataset::from_records(vec![
            CanonicalRecord { date: d(14), region: "north".into(), amount: Decimal::from(100) },
            CanonicalRecord { date: d(16), region: "south".into(), amount: Decimal::from(80) },
        ]);
        App::new(Arc::new(ds), &AppConfig::default(), RegionSelector::All).unwrap()
    }

    #[test]
    fn arrow_keys_walk_the_selector_list() {
        let mut app = app();
        assert_eq!(app.chart.line.len(), 2);

        app.handle_key(KeyCode::Down).unwrap();
        assert_eq!(app.binding.current().selector, RegionSelector::region("north"));
        assert_eq!(app.chart.line.len(), 1);

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        assert_eq!(app.selected, 2);
        assert_eq!(app.binding.current().selector, RegionSelector::region("south"));

        app.handle_key(KeyCode::Home).unwrap();
        assert_eq!(app.binding.current().selector, RegionSelector::All);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn chart_bounds_include_reference_marker() {
        let app = app();
        let mx = app.chart.marker_x.unwrap();
        assert!(app.chart.x_bounds[0] <= mx && mx <= app.chart.x_bounds[1]);
        assert!(app.chart.y_bounds[0] < 80.0 && app.chart.y_bounds[1] > 100.0);
    }

    #[test]
    fn unknown_initial_region_renders_empty_chart() {
        let ds = Dataset::from_records(Vec::new());
        let app = App::new(Arc::new(ds), &AppConfig::default(), RegionSelector::region("west")).unwrap();
        assert!(app.chart.line.is_empty());
        assert_eq!(app.selected, 0);
        assert_eq!(app.binding.current_index(), None);
        assert!(app.status.contains("region 'west' not found"));
    }
}
