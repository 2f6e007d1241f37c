//! Filter engine: narrows the dataset to the selected categories and
//! weekdays.

use std::collections::BTreeSet;
use std::fmt;

use dashboard_core::models::{month_name, month_number, OrderLine};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::Dataset;

/// Label of the month selector state that applies no month narrowing.
pub const ALL_MONTHS: &str = "All Months";

// ── FilterSelection ───────────────────────────────────────────────────────────

/// The user's category and weekday inclusion sets.
///
/// Values absent from the dataset are legal and simply match nothing. An
/// empty set yields an empty view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub weekdays: BTreeSet<String>,
}

impl FilterSelection {
    /// Build a selection from explicit category and weekday values.
    pub fn new<C, W>(categories: C, weekdays: W) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            weekdays: weekdays.into_iter().map(Into::into).collect(),
        }
    }

    /// Select every category and weekday present in `dataset`.
    pub fn all(dataset: &Dataset) -> Self {
        Self::new(
            dataset.categories().iter().cloned(),
            dataset.weekdays().iter().cloned(),
        )
    }

    /// Build a selection where `None` stands for the dataset's full domain.
    pub fn from_parts(
        dataset: &Dataset,
        categories: Option<Vec<String>>,
        weekdays: Option<Vec<String>>,
    ) -> Self {
        let full = Self::all(dataset);
        Self {
            categories: categories
                .map(|c| c.into_iter().collect())
                .unwrap_or(full.categories),
            weekdays: weekdays
                .map(|w| w.into_iter().collect())
                .unwrap_or(full.weekdays),
        }
    }

    /// `true` when every category and weekday of `dataset` is selected.
    pub fn is_full(&self, dataset: &Dataset) -> bool {
        dataset
            .categories()
            .iter()
            .all(|c| self.categories.contains(c))
            && dataset.weekdays().iter().all(|w| self.weekdays.contains(w))
    }

    /// `true` when `line` passes both inclusion sets.
    pub fn matches(&self, line: &OrderLine) -> bool {
        self.categories.contains(&line.category) && self.weekdays.contains(line.weekday())
    }

    /// Flip `category` in or out of the selection. Returns whether it is now
    /// selected.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        toggle(&mut self.categories, category)
    }

    /// Flip `weekday` in or out of the selection. Returns whether it is now
    /// selected.
    pub fn toggle_weekday(&mut self, weekday: &str) -> bool {
        toggle(&mut self.weekdays, weekday)
    }

    pub fn select_all_categories(&mut self, dataset: &Dataset) {
        self.categories = dataset.categories().iter().cloned().collect();
    }

    pub fn clear_categories(&mut self) {
        self.categories.clear();
    }

    pub fn select_all_weekdays(&mut self, dataset: &Dataset) {
        self.weekdays = dataset.weekdays().iter().cloned().collect();
    }

    pub fn clear_weekdays(&mut self) {
        self.weekdays.clear();
    }

    /// Selected values that do not occur anywhere in `dataset`.
    pub fn unknown_values<'s>(&'s self, dataset: &Dataset) -> Vec<&'s str> {
        let unknown_categories = self
            .categories
            .iter()
            .filter(|c| !dataset.categories().contains(*c));
        let unknown_weekdays = self
            .weekdays
            .iter()
            .filter(|w| !dataset.weekdays().contains(*w));
        unknown_categories
            .chain(unknown_weekdays)
            .map(String::as_str)
            .collect()
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}

// ── MonthFilter ───────────────────────────────────────────────────────────────

/// Month narrowing for the daily revenue trend.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MonthFilter {
    /// No month narrowing.
    #[default]
    AllMonths,
    /// Only the given month (1–12).
    Month(u32),
}

impl MonthFilter {
    /// Parse a selector label: `"All Months"` or an English month name.
    pub fn parse(label: &str) -> Option<Self> {
        if label.trim().eq_ignore_ascii_case(ALL_MONTHS) {
            return Some(MonthFilter::AllMonths);
        }
        month_number(label).map(MonthFilter::Month)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::AllMonths => f.write_str(ALL_MONTHS),
            MonthFilter::Month(m) => f.write_str(month_name(*m).unwrap_or("Unknown")),
        }
    }
}

// ── FilteredView ──────────────────────────────────────────────────────────────

/// A borrowed subset of a [`Dataset`]'s order lines.
///
/// Cheap to build and never mutated; recomputed whenever the selection
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    lines: Vec<&'a OrderLine>,
}

impl<'a> FilteredView<'a> {
    /// A view over every line of `dataset`.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            lines: dataset.lines().iter().collect(),
        }
    }

    pub fn from_lines(lines: Vec<&'a OrderLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[&'a OrderLine] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OrderLine> + '_ {
        self.lines.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Apply `selection` again on top of this view.
    pub fn refine(&self, selection: &FilterSelection) -> FilteredView<'a> {
        self.retain(|line| selection.matches(line))
    }

    /// Lines whose order falls in `year`.
    pub fn for_year(&self, year: i32) -> FilteredView<'a> {
        self.retain(|line| line.year() == year)
    }

    /// Lines whose order falls in `month` (1–12) of any year.
    pub fn for_month(&self, month: u32) -> FilteredView<'a> {
        self.retain(|line| line.month() == month)
    }

    /// Lines matching `month`; [`MonthFilter::AllMonths`] keeps everything.
    pub fn for_month_filter(&self, month: MonthFilter) -> FilteredView<'a> {
        match month {
            MonthFilter::AllMonths => self.clone(),
            MonthFilter::Month(m) => self.for_month(m),
        }
    }

    fn retain(&self, keep: impl Fn(&OrderLine) -> bool) -> FilteredView<'a> {
        FilteredView {
            lines: self.lines.iter().copied().filter(|l| keep(l)).collect(),
        }
    }
}

// ── filter ────────────────────────────────────────────────────────────────────

/// Narrow `dataset` to the lines whose category and weekday are both
/// selected.
///
/// Pure and deterministic; the result keeps dataset order.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let unknown = selection.unknown_values(dataset);
    if !unknown.is_empty() {
        debug!(?unknown, "ignoring selection values absent from the dataset");
    }
    FilteredView::all(dataset).refine(selection)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
