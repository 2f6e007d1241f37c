//! Request/response cycle for the dashboard.
//!
//! A [`DashboardRequest`] (filter selection plus per-year month choice) is
//! turned into a [`DashboardSnapshot`] holding every table, chart series and
//! KPI the presentation layer renders.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use dashboard_core::error::LoadError;
use dashboard_core::formatting::percentage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregator::{
    CategoryRevenue, CategoryVolume, CustomerLoyalty, CustomerSpend, DailyRevenueSeries,
    ItemPerformance, Kpis, SalesAggregator, WeekdayOrders, TOP_N,
};
use crate::dataset::Dataset;
use crate::filter::{filter, FilterSelection, MonthFilter};
use crate::reader::load_dataset;

// ── Request ───────────────────────────────────────────────────────────────────

/// Everything the user can choose on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub selection: FilterSelection,
    /// Month narrowing per trend panel year. Years without an entry show
    /// "All Months".
    #[serde(default)]
    pub months: BTreeMap<i32, MonthFilter>,
}

impl DashboardRequest {
    pub fn new(selection: FilterSelection) -> Self {
        Self {
            selection,
            months: BTreeMap::new(),
        }
    }

    /// The initial request: every category and weekday, all months.
    pub fn full(dataset: &Dataset) -> Self {
        Self::new(FilterSelection::all(dataset))
    }

    pub fn with_month(mut self, year: i32, month: MonthFilter) -> Self {
        self.months.insert(year, month);
        self
    }

    /// Requested month for `year`, defaulting to "All Months".
    pub fn month_for(&self, year: i32) -> MonthFilter {
        self.months.get(&year).copied().unwrap_or_default()
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Metadata produced alongside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// ISO-8601 timestamp when this snapshot was generated.
    pub generated_at: String,
    /// Rows in the loaded dataset.
    pub total_rows: usize,
    /// Rows left after category/weekday filtering.
    pub filtered_rows: usize,
    /// Wall-clock seconds spent aggregating.
    pub compute_time_seconds: f64,
}

/// The daily revenue trend panel for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPanel {
    pub year: i32,
    /// Selector options: "All Months" then the months with orders.
    pub month_options: Vec<MonthFilter>,
    /// Always one of `month_options`.
    pub selected_month: MonthFilter,
    pub series: DailyRevenueSeries,
}

/// All computed outputs for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub metadata: SnapshotMetadata,
    pub kpis: Kpis,
    pub top_spenders: Vec<CustomerSpend>,
    pub most_loyal: Vec<CustomerLoyalty>,
    pub revenue_by_category: Vec<CategoryRevenue>,
    pub volume_by_category: Vec<CategoryVolume>,
    pub item_performance: Vec<ItemPerformance>,
    pub orders_by_weekday: Vec<WeekdayOrders>,
    /// One panel per year present in the dataset, ascending.
    pub year_panels: Vec<YearPanel>,
}

impl DashboardSnapshot {
    /// Headline "Top Spender" callout; `None` for an empty view.
    pub fn top_spender(&self) -> Option<&CustomerSpend> {
        self.top_spenders.first()
    }

    /// Headline "Most Loyal Customer" callout; `None` for an empty view.
    pub fn most_loyal_customer(&self) -> Option<&CustomerLoyalty> {
        self.most_loyal.first()
    }

    /// Share of total revenue for a category row, in percent (one decimal).
    pub fn revenue_share(&self, row: &CategoryRevenue) -> f64 {
        percentage(row.total_revenue, self.kpis.total_revenue, 1)
    }

    pub fn year_panel(&self, year: i32) -> Option<&YearPanel> {
        self.year_panels.iter().find(|p| p.year == year)
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.filtered_rows == 0
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Compute a full snapshot for `request` over `dataset`.
///
/// Pure apart from the timestamp and timing metadata. Month choices that are
/// not among a year's options fall back to "All Months".
pub fn build_snapshot(dataset: &Dataset, request: &DashboardRequest) -> DashboardSnapshot {
    let started = std::time::Instant::now();
    let view = filter(dataset, &request.selection);

    let year_panels = dataset
        .years()
        .iter()
        .map(|&year| {
            let month_options = SalesAggregator::month_options(&view, year);
            let selected_month = reconcile_month(&month_options, request.month_for(year));
            YearPanel {
                year,
                series: SalesAggregator::daily_revenue(&view, year, selected_month),
                month_options,
                selected_month,
            }
        })
        .collect();

    let snapshot = DashboardSnapshot {
        kpis: SalesAggregator::kpis(&view),
        top_spenders: SalesAggregator::top_spenders(&view, TOP_N),
        most_loyal: SalesAggregator::most_loyal(&view, TOP_N),
        revenue_by_category: SalesAggregator::revenue_by_category(&view),
        volume_by_category: SalesAggregator::volume_by_category(&view),
        item_performance: SalesAggregator::item_performance(&view),
        orders_by_weekday: SalesAggregator::orders_by_weekday(&view),
        year_panels,
        metadata: SnapshotMetadata {
            generated_at: Utc::now().to_rfc3339(),
            total_rows: dataset.len(),
            filtered_rows: view.len(),
            compute_time_seconds: started.elapsed().as_secs_f64(),
        },
    };

    debug!(
        total_rows = snapshot.metadata.total_rows,
        filtered_rows = snapshot.metadata.filtered_rows,
        elapsed_s = snapshot.metadata.compute_time_seconds,
        "built dashboard snapshot"
    );
    snapshot
}

/// Load `path` and build the initial snapshot in one step.
pub fn analyze_file(path: &Path) -> Result<(Dataset, DashboardSnapshot), LoadError> {
    let dataset = load_dataset(path)?;
    info!(rows = dataset.len(), path = %path.display(), "dataset loaded");
    let snapshot = build_snapshot(&dataset, &DashboardRequest::full(&dataset));
    Ok((dataset, snapshot))
}

/// Keep `requested` when it is a valid option, otherwise "All Months".
pub fn reconcile_month(options: &[MonthFilter], requested: MonthFilter) -> MonthFilter {
    if options.contains(&requested) {
        requested
    } else {
        MonthFilter::AllMonths
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use dashboard_core::models::OrderLine;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn line(order: &str, cust: &str, category: &str, total: f64, ts: &str) -> OrderLine {
        let ts = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
        OrderLine::new(order, cust, category, "Thing", 1, total, ts)
    }

    fn dataset() -> Dataset {
        Dataset::from_lines(
            vec![
                line("1", "A", "Drinks", 10.0, "2022-01-03 10:00:00"),
                line("2", "A", "Food", 20.0, "2022-02-07 12:00:00"),
                line("3", "B", "Drinks", 5.0, "2023-01-03 09:00:00"),
                line("4", "C", "Food", 35.0, "2023-05-02 19:00:00"),
            ],
            "test",
        )
    }

    #[test]
    fn test_full_request_snapshot() {
        let ds = dataset();
        let snap = build_snapshot(&ds, &DashboardRequest::full(&ds));

        assert_eq!(snap.metadata.total_rows, 4);
        assert_eq!(snap.metadata.filtered_rows, 4);
        assert!((snap.kpis.total_revenue - 70.0).abs() < 1e-9);
        assert_eq!(snap.top_spender().map(|c| c.cust_id.as_str()), Some("C"));
        assert_eq!(
            snap.most_loyal_customer().map(|c| c.cust_id.as_str()),
            Some("A")
        );

        let years: Vec<i32> = snap.year_panels.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2022, 2023]);
        for panel in &snap.year_panels {
            assert_eq!(panel.selected_month, MonthFilter::AllMonths);
            assert_eq!(panel.series.points().len(), 2);
        }
    }

    #[test]
    fn test_revenue_share_sums_to_hundred() {
        let ds = dataset();
        let snap = build_snapshot(&ds, &DashboardRequest::full(&ds));
        let total: f64 = snap
            .revenue_by_category
            .iter()
            .map(|r| snap.revenue_share(r))
            .sum();
        assert!((total - 100.0).abs() < 0.2, "share total = {total}");
    }

    #[test]
    fn test_month_selection_narrows_one_panel() {
        let ds = dataset();
        let request = DashboardRequest::full(&ds).with_month(2023, MonthFilter::Month(5));
        let snap = build_snapshot(&ds, &request);

        let panel_2023 = snap.year_panel(2023).unwrap();
        assert_eq!(panel_2023.selected_month, MonthFilter::Month(5));
        assert_eq!(panel_2023.series.points().len(), 1);

        let panel_2022 = snap.year_panel(2022).unwrap();
        assert_eq!(panel_2022.selected_month, MonthFilter::AllMonths);
    }

    #[test]
    fn test_invalid_month_reconciled_to_all_months() {
        let ds = dataset();
        let request = DashboardRequest::full(&ds).with_month(2022, MonthFilter::Month(11));
        let snap = build_snapshot(&ds, &request);
        let panel = snap.year_panel(2022).unwrap();
        assert_eq!(panel.selected_month, MonthFilter::AllMonths);
        assert!(panel.month_options.contains(&panel.selected_month));
    }

    #[test]
    fn test_month_options_shrink_with_filter() {
        let ds = dataset();
        // Drinks only: 2023 keeps January, May disappears.
        let request = DashboardRequest::new(FilterSelection::new(
            ["Drinks"],
            ds.weekdays().iter().cloned(),
        ))
        .with_month(2023, MonthFilter::Month(5));
        let snap = build_snapshot(&ds, &request);
        let panel = snap.year_panel(2023).unwrap();
        assert_eq!(
            panel.month_options,
            vec![MonthFilter::AllMonths, MonthFilter::Month(1)]
        );
        assert_eq!(panel.selected_month, MonthFilter::AllMonths);
    }

    #[test]
    fn test_empty_selection_snapshot() {
        let ds = dataset();
        let request = DashboardRequest::new(FilterSelection::new(
            Vec::<String>::new(),
            ds.weekdays().iter().cloned(),
        ));
        let snap = build_snapshot(&ds, &request);
        assert!(snap.is_empty());
        assert!(snap.top_spender().is_none());
        assert!(snap.most_loyal_customer().is_none());
        assert!(snap.kpis.average_order_value.is_none());
        assert!(snap.year_panels.iter().all(|p| p.series.is_no_data()));
        assert_eq!(snap.year_panels.len(), 2);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let ds = dataset();
        let snap = build_snapshot(&ds, &DashboardRequest::full(&ds));
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["metadata"]["total_rows"], 4);
        assert_eq!(json["year_panels"][0]["series"]["status"], "series");
        assert!(json["kpis"]["total_revenue"].as_f64().is_some());
    }

    #[test]
    fn test_analyze_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "order_id,cust_id,category,item,quantity,order_total,order_date"
        )
        .unwrap();
        writeln!(file, "1,A,Drinks,Tea,2,10.0,2023-01-02 10:00:00").unwrap();
        writeln!(file, "2,B,Food,Burger,1,20.0,2023-01-03 12:00:00").unwrap();
        file.flush().unwrap();

        let (ds, snap) = analyze_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(snap.metadata.filtered_rows, 2);
    }

    #[test]
    fn test_analyze_file_missing() {
        let err = analyze_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::DataPathNotFound(_)));
    }

    #[test]
    fn test_reconcile_month() {
        let options = vec![MonthFilter::AllMonths, MonthFilter::Month(3)];
        assert_eq!(reconcile_month(&options, MonthFilter::Month(3)), MonthFilter::Month(3));
        assert_eq!(reconcile_month(&options, MonthFilter::Month(4)), MonthFilter::AllMonths);
    }
}
