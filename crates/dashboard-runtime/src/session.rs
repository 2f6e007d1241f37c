//! Interactive dashboard state.
//!
//! [`DashboardSession`] holds what the user has chosen (category and weekday
//! selection plus one month per trend panel) and recomputes a full
//! [`DashboardSnapshot`] on demand.

use std::sync::Arc;

use dashboard_data::aggregator::SalesAggregator;
use dashboard_data::analysis::{build_snapshot, reconcile_month, DashboardRequest, DashboardSnapshot};
use dashboard_data::dataset::Dataset;
use dashboard_data::filter::{filter, FilterSelection, MonthFilter};

pub struct DashboardSession {
    dataset: Arc<Dataset>,
    request: DashboardRequest,
}

impl DashboardSession {
    /// Start with every category and weekday selected and no month narrowing.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let request = DashboardRequest::full(&dataset);
        Self { dataset, request }
    }

    pub fn with_request(dataset: Arc<Dataset>, request: DashboardRequest) -> Self {
        Self { dataset, request }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn request(&self) -> &DashboardRequest {
        &self.request
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.request.selection
    }

    // ── Selection mutators ────────────────────────────────────────────────

    /// Returns `true` when the category is selected afterwards.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        self.request.selection.toggle_category(category)
    }

    /// Returns `true` when the weekday is selected afterwards.
    pub fn toggle_weekday(&mut self, weekday: &str) -> bool {
        self.request.selection.toggle_weekday(weekday)
    }

    pub fn select_all_categories(&mut self) {
        self.request.selection.select_all_categories(&self.dataset);
    }

    pub fn clear_categories(&mut self) {
        self.request.selection.clear_categories();
    }

    pub fn select_all_weekdays(&mut self) {
        self.request.selection.select_all_weekdays(&self.dataset);
    }

    pub fn clear_weekdays(&mut self) {
        self.request.selection.clear_weekdays();
    }

    // ── Month selection ───────────────────────────────────────────────────

    /// Selector options for `year` under the current selection.
    pub fn month_options(&self, year: i32) -> Vec<MonthFilter> {
        let view = filter(&self.dataset, &self.request.selection);
        SalesAggregator::month_options(&view, year)
    }

    /// Effective month for `year`: the stored choice when still valid,
    /// otherwise "All Months".
    pub fn month(&self, year: i32) -> MonthFilter {
        reconcile_month(&self.month_options(year), self.request.month_for(year))
    }

    pub fn set_month(&mut self, year: i32, month: MonthFilter) {
        self.request.months.insert(year, month);
    }

    /// Step the month selector for `year` forward or backward, wrapping
    /// around. Returns the new choice.
    pub fn cycle_month(&mut self, year: i32, forward: bool) -> MonthFilter {
        let options = self.month_options(year);
        let current = reconcile_month(&options, self.request.month_for(year));
        let index = options.iter().position(|m| *m == current).unwrap_or(0);
        let len = options.len().max(1);
        let next_index = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        let next = options.get(next_index).copied().unwrap_or_default();
        self.set_month(year, next);
        tracing::debug!(year, month = %next, "month selection changed");
        next
    }

    // ── Output ────────────────────────────────────────────────────────────

    /// Recompute every table, chart and KPI for the current choices.
    pub fn snapshot(&self) -> DashboardSnapshot {
        build_snapshot(&self.dataset, &self.request)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
