//! One-shot plain-text report of a snapshot, printed by the summary view.

use ratatui::layout::Constraint;

use dashboard_core::formatting::{format_average, format_currency, format_items};
use dashboard_data::analysis::{DashboardSnapshot, YearPanel};

use crate::chart_view::NO_MONTH_DATA_MESSAGE;
use crate::table_view::{
    category_table, item_table, most_loyal_table, top_spenders_table, weekday_table, TableData,
};

/// Render every section of `snapshot` as text. When `year` is given only
/// that year's daily revenue panel is included.
pub fn render_summary_text(snapshot: &DashboardSnapshot, year: Option<i32>) -> String {
    let kpis = &snapshot.kpis;
    let mut sections = vec![format!(
        "Restaurant Sales Summary ({} of {} rows)\n\
         Total Revenue:        {}\n\
         Total Items Sold:     {}\n\
         Average Order Value:  {}\n\
         Top Spender:          {}\n\
         Most Loyal Customer:  {}\n",
        snapshot.metadata.filtered_rows,
        snapshot.metadata.total_rows,
        format_currency(kpis.total_revenue),
        format_items(kpis.total_items_sold),
        format_average(kpis.average_order_value),
        snapshot
            .top_spender()
            .map(|c| format!("{} ({})", c.cust_id, format_currency(c.total_spent)))
            .unwrap_or_else(|| "no data".to_string()),
        snapshot
            .most_loyal_customer()
            .map(|c| format!("{} ({} orders)", c.cust_id, c.total_orders))
            .unwrap_or_else(|| "no data".to_string()),
    )];

    for table in [
        category_table(snapshot),
        weekday_table(snapshot),
        top_spenders_table(snapshot),
        most_loyal_table(snapshot),
        item_table(snapshot),
    ] {
        sections.push(table.to_plain_text());
    }

    for panel in snapshot
        .year_panels
        .iter()
        .filter(|p| year.map_or(true, |y| p.year == y))
    {
        sections.push(daily_revenue_text(panel));
    }

    sections.join("\n")
}

fn daily_revenue_text(panel: &YearPanel) -> String {
    let title = format!("Daily Revenue {} ({})", panel.year, panel.selected_month);
    if panel.series.is_no_data() {
        return format!("{}\n{}\n", title, NO_MONTH_DATA_MESSAGE);
    }
    TableData {
        title,
        headers: vec!["Day", "Revenue"],
        rows: panel
            .series
            .points()
            .iter()
            .map(|p| {
                vec![
                    p.day.format("%Y-%m-%d").to_string(),
                    format_currency(p.daily_revenue),
                ]
            })
            .collect(),
        total: None,
        widths: vec![Constraint::Length(10), Constraint::Length(14)],
    }
    .to_plain_text()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
