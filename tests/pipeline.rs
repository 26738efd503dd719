use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use morsel_sales::app::binding::{SalesBinding, SeriesRenderer, SeriesView};
use morsel_sales::app::pipeline::{load_dataset, process_files};
use morsel_sales::domain::{AppConfig, RegionSelector};
use morsel_sales::error::AppError;
use morsel_sales::sales::{query, series_total};
use rust_decimal::Decimal;

const DAY_0: &str = "\
product,price,quantity,date,region
pink morsel,$3.00,100,2021-01-14,north
pink morsel,$3.00,50,2021-01-14,south
gold morsel,$9.99,1000,2021-01-14,north
Pink Morsel,$3.00,999,2021-01-14,north
";

const DAY_1: &str = "\
product,price,quantity,date,region
pink morsel,$5.00,16,2021-01-16,north
pink morsel,$5.00,bad,2021-01-16,east
";

fn setup() -> (tempfile::TempDir, AppConfig, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("daily_sales_data_0.csv");
    let b = dir.path().join("daily_sales_data_1.csv");
    fs::write(&a, DAY_0).unwrap();
    fs::write(&b, DAY_1).unwrap();
    let config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        canonical_path: dir.path().join("processed_sales_data.csv"),
        ..AppConfig::default()
    };
    (dir, config, vec![a, b])
}

struct Frames(Vec<SeriesView>);

impl SeriesRenderer for Frames {
    fn render(&mut self, view: &SeriesView) -> Result<(), AppError> {
        self.0.push(view.clone());
        Ok(())
    }
}

#[test]
fn raw_files_to_region_series() {
    let (_dir, config, files) = setup();
    let out = process_files(&files, &config.canonical_path, &config).unwrap();
    assert_eq!(out.report.rows_read, 6);
    assert_eq!(out.report.quantity_fallbacks, 1);
    assert_eq!(out.dataset.len(), 4);

    let text = fs::read_to_string(&config.canonical_path).unwrap();
    assert!(text.starts_with("Sales,Date,Region\n"));

    let ds = load_dataset(&config).unwrap();
    let all = query(&ds, &RegionSelector::All);
    assert_eq!(series_total(&all), ds.total());
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2021, 1, 14).unwrap());
    assert_eq!(all[0].total_amount, Decimal::from(450));
    assert_eq!(all[1].total_amount, Decimal::from(80));

    // The coerced row is kept with a zero amount.
    let east = query(&ds, &RegionSelector::region("east"));
    assert_eq!(east.len(), 1);
    assert_eq!(east[0].total_amount, Decimal::ZERO);

    assert!(query(&ds, &RegionSelector::region("west")).is_empty());
}

#[test]
fn binding_publishes_every_selection() {
    let (_dir, config, files) = setup();
    process_files(&files, &config.canonical_path, &config).unwrap();
    let ds = load_dataset(&config).unwrap();

    let mut binding = SalesBinding::new(ds, &config);
    let labels: Vec<String> = binding.options().iter().map(|o| o.to_string()).collect();
    assert_eq!(labels, ["All", "east", "north", "south"]);

    let mut frames = Frames(Vec::new());
    for option in binding.options().to_vec() {
        binding.select(option, &mut frames).unwrap();
    }
    binding.select(RegionSelector::All, &mut frames).unwrap();

    let lens: Vec<usize> = frames.0.iter().map(|f| f.points.len()).collect();
    assert_eq!(lens, [2, 1, 2, 1, 2]);
    assert_eq!(frames.0[0], frames.0[4]);
    assert!(frames.0.iter().all(|f| f.reference_date == config.reference_date));
}
