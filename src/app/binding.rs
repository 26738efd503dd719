//! Selector → series → renderer binding.
//!
//! A front-end owns one `SalesBinding`. Each selector change is resolved
//! completely (query + hand-off to the renderer) before `select` returns, and
//! `&mut self` keeps changes strictly one at a time.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{AppConfig, Dataset, RegionSelector, SeriesPoint};
use crate::error::AppError;
use crate::sales::{query, selector_options};

/// Everything a chart needs to draw one selector's series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesView {
    pub selector: RegionSelector,
    pub title: String,
    pub points: Vec<SeriesPoint>,
    /// Vertical marker; comes from configuration, never from the data.
    pub reference_date: NaiveDate,
}

impl SeriesView {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Display surface that accepts a recomputed series.
pub trait SeriesRenderer {
    fn render(&mut self, view: &SeriesView) -> Result<(), AppError>;
}

pub struct SalesBinding {
    dataset: Arc<Dataset>,
    product: String,
    reference_date: NaiveDate,
    options: Vec<RegionSelector>,
    current: SeriesView,
}

impl SalesBinding {
    /// Start at `All` with the series already computed.
    pub fn new(dataset: Arc<Dataset>, config: &AppConfig) -> Self {
        let options = selector_options(&dataset);
        let current = build_view(&dataset, &config.tracked_product, config.reference_date, RegionSelector::All);
        Self {
            dataset,
            product: config.tracked_product.clone(),
            reference_date: config.reference_date,
            options,
            current,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// `All` followed by the sorted regions.
    pub fn options(&self) -> &[RegionSelector] {
        &self.options
    }

    pub fn current(&self) -> &SeriesView {
        &self.current
    }

    /// Position of the current selector within `options()`, if it is listed.
    pub fn current_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.current.selector)
    }

    /// Recompute for `selector` and hand the result to `renderer`.
    pub fn select<R: SeriesRenderer + ?Sized>(
        &mut self,
        selector: RegionSelector,
        renderer: &mut R,
    ) -> Result<&SeriesView, AppError> {
        self.recompute(selector);
        renderer.render(&self.current)?;
        Ok(&self.current)
    }

    /// Like [`select`](Self::select) with the `index`-th option. Out-of-range
    /// indices are clamped to the last option.
    pub fn select_index<R: SeriesRenderer + ?Sized>(
        &mut self,
        index: usize,
        renderer: &mut R,
    ) -> Result<&SeriesView, AppError> {
        let idx = index.min(self.options.len().saturating_sub(1));
        let selector = self.options.get(idx).cloned().unwrap_or_default();
        self.select(selector, renderer)
    }

    /// Recompute without rendering; for front-ends that redraw on their own schedule.
    pub fn recompute(&mut self, selector: RegionSelector) -> &SeriesView {
        self.current = build_view(&self.dataset, &self.product, self.reference_date, selector);
        debug!(
            selector = %self.current.selector,
            points = self.current.points.len(),
            "recomputed series"
        );
        &self.current
    }
}

fn build_view(dataset: &Dataset, product: &str, reference_date: NaiveDate, selector: RegionSelector) -> SeriesView {
    let points = query(dataset, &selector);
    SeriesView {
        title: series_title(product, &selector),
        selector,
        points,
        reference_date,
    }
}

/// Chart title, e.g. `Daily sales of pink morsel (total)`.
pub fn series_title(product: &str, selector: &RegionSelector) -> String {
    match selector {
        RegionSelector::All => format!("Daily sales of {product} (total)"),
        RegionSelector::Region(r) => format!("Daily sales of {product} ({r})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalRecord;
    use rust_decimal::Decimal;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(String, usize)>,
    }

    impl SeriesRenderer for Recorder {
        fn render(&mut self, view: &SeriesView) -> Result<(), AppError> {
            self.seen.push((view.selector.to_string(), view.points.len()));
            Ok(())
        }
    }

    fn binding() -> SalesBinding {
        let d = |day| NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
        let ds = Dataset::from_records(vec![
            CanonicalRecord { date: d(14), region: "north".into(), amount: Decimal::from(100) },
            CanonicalRecord { date: d(14), region: "south".into(), amount: Decimal::from(50) },
            CanonicalRecord { date: d(16), region: "north".into(), amount: Decimal::from(80) },
        ]);
        SalesBinding::new(Arc::new(ds), &AppConfig::default())
    }

    #[test]
    fn starts_at_all() {
        let b = binding();
        assert_eq!(b.current().selector, RegionSelector::All);
        assert_eq!(b.current().points.len(), 2);
        assert_eq!(b.current_index(), Some(0));
        assert_eq!(b.current().reference_date.to_string(), "2021-01-15");
    }

    #[test]
    fn each_change_is_rendered_in_order() {
        let mut b = binding();
        let mut r = Recorder::default();

        b.select(RegionSelector::region("south"), &mut r).unwrap();
        b.select(RegionSelector::region("west"), &mut r).unwrap();
        b.select_index(1, &mut r).unwrap();

        assert_eq!(
            r.seen,
            [("south".to_string(), 1), ("west".to_string(), 0), ("north".to_string(), 2)]
        );
        assert!(b.select(RegionSelector::region("west"), &mut r).unwrap().is_empty());
    }

    #[test]
    fn select_index_clamps() {
        let mut b = binding();
        let mut r = Recorder::default();
        let view = b.select_index(99, &mut r).unwrap();
        assert_eq!(view.selector, RegionSelector::region("south"));
    }

    #[test]
    fn titles_name_the_selector() {
        assert_eq!(
            series_title("pink morsel", &RegionSelector::All),
            "Daily sales of pink morsel (total)"
        );
        assert_eq!(
            series_title("pink morsel", &RegionSelector::region("east")),
            "Daily sales of pink morsel (east)"
        );
    }
}
