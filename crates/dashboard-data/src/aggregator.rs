//! Aggregation pipeline over a filtered view.
//!
//! Every table and KPI on the dashboard is a group-by → aggregate → sort →
//! top-N pass over the current [`FilteredView`]. All functions here are
//! pure and return empty tables (or "no data") for an empty view.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use dashboard_core::models::{compare_ids, weekday_index, OrderLine};
use serde::{Deserialize, Serialize};

use crate::filter::{FilteredView, MonthFilter};

/// Row limit for the customer leaderboards.
pub const TOP_N: usize = 10;

// ── Result rows ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSpend {
    pub cust_id: String,
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerLoyalty {
    pub cust_id: String,
    /// Distinct orders placed by the customer.
    pub total_orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVolume {
    pub category: String,
    pub total_quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPerformance {
    pub category: String,
    pub item: String,
    pub total_quantity: u64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayOrders {
    pub weekday: String,
    /// Distinct orders placed on this weekday.
    pub total_orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub daily_revenue: f64,
}

/// Daily revenue time series for one year / month selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "points", rename_all = "snake_case")]
pub enum DailyRevenueSeries {
    /// No order falls in the requested year / month.
    NoData,
    /// Points ascending by day; never empty.
    Series(Vec<DailyRevenue>),
}

impl DailyRevenueSeries {
    pub fn is_no_data(&self) -> bool {
        matches!(self, DailyRevenueSeries::NoData)
    }

    /// The points of the series, empty for [`DailyRevenueSeries::NoData`].
    pub fn points(&self) -> &[DailyRevenue] {
        match self {
            DailyRevenueSeries::NoData => &[],
            DailyRevenueSeries::Series(points) => points,
        }
    }
}

/// Headline scalars over a filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Sum of `order_total`.
    pub total_revenue: f64,
    /// Sum of `quantity`.
    pub total_items_sold: u64,
    /// Mean `order_total` per order line; `None` when the view is empty.
    pub average_order_value: Option<f64>,
    /// Number of order lines in the view.
    pub order_lines: usize,
    /// Number of distinct order ids in the view.
    pub distinct_orders: usize,
}

impl Kpis {
    /// Average order value with the empty view reported as zero.
    pub fn average_order_value_or_zero(&self) -> f64 {
        self.average_order_value.unwrap_or(0.0)
    }
}

// ── Accumulators ──────────────────────────────────────────────────────────────

/// Running totals for one group key.
#[derive(Debug, Default)]
struct GroupStats<'a> {
    revenue: f64,
    quantity: u64,
    orders: HashSet<&'a str>,
}

impl<'a> GroupStats<'a> {
    fn add_line(&mut self, line: &'a OrderLine) {
        self.revenue += line.order_total;
        self.quantity = self.quantity.saturating_add(line.quantity);
        self.orders.insert(line.order_id.as_str());
    }
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper implementing every dashboard aggregation.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Customers ranked by total spend, highest first, at most `n` rows.
    ///
    /// Ties are broken by customer id ascending.
    pub fn top_spenders(view: &FilteredView<'_>, n: usize) -> Vec<CustomerSpend> {
        let mut rows: Vec<CustomerSpend> = Self::group_by(view, |l| l.cust_id.as_str())
            .into_iter()
            .map(|(cust_id, stats)| CustomerSpend {
                cust_id: cust_id.to_string(),
                total_spent: stats.revenue,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_spent
                .total_cmp(&a.total_spent)
                .then_with(|| compare_ids(&a.cust_id, &b.cust_id))
        });
        rows.truncate(n);
        rows
    }

    /// Customers ranked by distinct order count, highest first, at most `n`
    /// rows.
    ///
    /// Ties are broken by customer id ascending.
    pub fn most_loyal(view: &FilteredView<'_>, n: usize) -> Vec<CustomerLoyalty> {
        let mut rows: Vec<CustomerLoyalty> = Self::group_by(view, |l| l.cust_id.as_str())
            .into_iter()
            .map(|(cust_id, stats)| CustomerLoyalty {
                cust_id: cust_id.to_string(),
                total_orders: stats.orders.len(),
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_orders
                .cmp(&a.total_orders)
                .then_with(|| compare_ids(&a.cust_id, &b.cust_id))
        });
        rows.truncate(n);
        rows
    }

    /// Revenue per category, sorted by category name.
    pub fn revenue_by_category(view: &FilteredView<'_>) -> Vec<CategoryRevenue> {
        Self::group_by(view, |l| l.category.as_str())
            .into_iter()
            .map(|(category, stats)| CategoryRevenue {
                category: category.to_string(),
                total_revenue: stats.revenue,
            })
            .collect()
    }

    /// Units sold per category, sorted by category name.
    pub fn volume_by_category(view: &FilteredView<'_>) -> Vec<CategoryVolume> {
        Self::group_by(view, |l| l.category.as_str())
            .into_iter()
            .map(|(category, stats)| CategoryVolume {
                category: category.to_string(),
                total_quantity: stats.quantity,
            })
            .collect()
    }

    /// Units and revenue per `(category, item)`, sorted by category then item.
    pub fn item_performance(view: &FilteredView<'_>) -> Vec<ItemPerformance> {
        Self::group_by(view, |l| (l.category.as_str(), l.item.as_str()))
            .into_iter()
            .map(|((category, item), stats)| ItemPerformance {
                category: category.to_string(),
                item: item.to_string(),
                total_quantity: stats.quantity,
                total_revenue: stats.revenue,
            })
            .collect()
    }

    /// Distinct orders per weekday, Monday first. Weekdays without orders
    /// are omitted.
    pub fn orders_by_weekday(view: &FilteredView<'_>) -> Vec<WeekdayOrders> {
        // Unknown names cannot occur for derived weekdays; they would sort last.
        Self::group_by(view, |l| {
            (weekday_index(l.weekday()).unwrap_or(usize::MAX), l.weekday())
        })
        .into_iter()
        .map(|((_, weekday), stats)| WeekdayOrders {
            weekday: weekday.to_string(),
            total_orders: stats.orders.len(),
        })
        .collect()
    }

    /// Daily revenue for `year`, optionally narrowed to one month.
    ///
    /// Returns [`DailyRevenueSeries::NoData`] when nothing matches.
    pub fn daily_revenue(
        view: &FilteredView<'_>,
        year: i32,
        month: MonthFilter,
    ) -> DailyRevenueSeries {
        let subset = view.for_year(year).for_month_filter(month);

        let points: Vec<DailyRevenue> = Self::group_by(&subset, |l| l.day())
            .into_iter()
            .map(|(day, stats)| DailyRevenue {
                day,
                daily_revenue: stats.revenue,
            })
            .collect();

        if points.is_empty() {
            DailyRevenueSeries::NoData
        } else {
            DailyRevenueSeries::Series(points)
        }
    }

    /// Month selector options for `year`: "All Months" followed by every
    /// month that has orders in the view, ascending.
    pub fn month_options(view: &FilteredView<'_>, year: i32) -> Vec<MonthFilter> {
        let months: BTreeSet<u32> = view.for_year(year).iter().map(|l| l.month()).collect();
        std::iter::once(MonthFilter::AllMonths)
            .chain(months.into_iter().map(MonthFilter::Month))
            .collect()
    }

    /// Total revenue, items sold and average order value.
    pub fn kpis(view: &FilteredView<'_>) -> Kpis {
        let mut totals = GroupStats::default();
        for line in view.iter() {
            totals.add_line(line);
        }

        let average_order_value = if view.is_empty() {
            None
        } else {
            Some(totals.revenue / view.len() as f64)
        };

        Kpis {
            total_revenue: totals.revenue,
            total_items_sold: totals.quantity,
            average_order_value,
            order_lines: view.len(),
            distinct_orders: totals.orders.len(),
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic grouping driver. `key_fn` maps a line to its group key; the
    /// map's ordering gives a deterministic output order.
    fn group_by<'a, K: Ord>(
        view: &FilteredView<'a>,
        key_fn: impl Fn(&'a OrderLine) -> K,
    ) -> BTreeMap<K, GroupStats<'a>> {
        let mut map: BTreeMap<K, GroupStats<'a>> = BTreeMap::new();
        for line in view.iter() {
            map.entry(key_fn(line)).or_default().add_line(line);
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
