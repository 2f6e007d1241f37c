//! Aggregate tables for the dashboard pages and the printed summary.
//!
//! Each builder turns a slice of a [`DashboardSnapshot`] into a
//! [`TableData`], which renders either as a bordered
//! [`ratatui::widgets::Table`] or as aligned plain text.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use dashboard_core::formatting::{format_currency, format_items, format_number, percentage};
use dashboard_data::analysis::DashboardSnapshot;

use crate::themes::Theme;

/// Placeholder shown in place of an empty table or chart.
pub const NO_DATA_MESSAGE: &str = "No data available for the current selection.";

/// A titled table with a header, body rows and an optional totals row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub total: Option<Vec<String>>,
    /// Column widths for the TUI; plain text sizes columns to content.
    pub widths: Vec<Constraint>,
}

impl TableData {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as aligned text: first column left, the rest right-aligned.
    pub fn to_plain_text(&self) -> String {
        let mut all_rows: Vec<Vec<String>> = vec![self.headers.iter().map(|h| h.to_string()).collect()];
        all_rows.extend(self.rows.iter().cloned());
        if let Some(total) = &self.total {
            all_rows.push(total.clone());
        }

        let columns = self.headers.len();
        let widths: Vec<usize> = (0..columns)
            .map(|c| {
                all_rows
                    .iter()
                    .filter_map(|r| r.get(c))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = format!("{}\n", self.title);
        let rule_width = widths.iter().sum::<usize>() + 2 * columns.saturating_sub(1);
        out.push_str(&"-".repeat(rule_width));
        out.push('\n');

        if self.rows.is_empty() {
            out.push_str(NO_DATA_MESSAGE);
            out.push('\n');
            return out;
        }

        for (i, row) in all_rows.iter().enumerate() {
            if self.total.is_some() && i == all_rows.len() - 1 {
                out.push_str(&"-".repeat(rule_width));
                out.push('\n');
            }
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    let pad = widths[c].saturating_sub(cell.width());
                    if c == 0 {
                        format!("{}{}", cell, " ".repeat(pad))
                    } else {
                        format!("{}{}", " ".repeat(pad), cell)
                    }
                })
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

// ── Builders ──────────────────────────────────────────────────────────────────

pub fn top_spenders_table(snapshot: &DashboardSnapshot) -> TableData {
    TableData {
        title: "Top Spenders".to_string(),
        headers: vec!["#", "Customer", "Total Spent"],
        rows: snapshot
            .top_spenders
            .iter()
            .enumerate()
            .map(|(i, c)| {
                vec![
                    (i + 1).to_string(),
                    c.cust_id.clone(),
                    format_currency(c.total_spent),
                ]
            })
            .collect(),
        total: None,
        widths: vec![
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(16),
        ],
    }
}

pub fn most_loyal_table(snapshot: &DashboardSnapshot) -> TableData {
    TableData {
        title: "Most Loyal Customers".to_string(),
        headers: vec!["#", "Customer", "Orders"],
        rows: snapshot
            .most_loyal
            .iter()
            .enumerate()
            .map(|(i, c)| {
                vec![
                    (i + 1).to_string(),
                    c.cust_id.clone(),
                    format_number(c.total_orders as f64, 0),
                ]
            })
            .collect(),
        total: None,
        widths: vec![
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(10),
        ],
    }
}

/// Revenue, share of revenue and units per category, with a totals row.
pub fn category_table(snapshot: &DashboardSnapshot) -> TableData {
    let rows: Vec<Vec<String>> = snapshot
        .revenue_by_category
        .iter()
        .map(|r| {
            let quantity = snapshot
                .volume_by_category
                .iter()
                .find(|v| v.category == r.category)
                .map(|v| v.total_quantity)
                .unwrap_or(0);
            vec![
                r.category.clone(),
                format_currency(r.total_revenue),
                format!("{:.1}%", snapshot.revenue_share(r)),
                format_items(quantity),
            ]
        })
        .collect();

    let total = (!rows.is_empty()).then(|| {
        vec![
            "TOTAL".to_string(),
            format_currency(snapshot.kpis.total_revenue),
            format!(
                "{:.1}%",
                percentage(snapshot.kpis.total_revenue, snapshot.kpis.total_revenue, 1)
            ),
            format_items(snapshot.kpis.total_items_sold),
        ]
    });

    TableData {
        title: "Sales by Category".to_string(),
        headers: vec!["Category", "Revenue", "Share", "Items Sold"],
        rows,
        total,
        widths: vec![
            Constraint::Min(12),
            Constraint::Length(16),
            Constraint::Length(8),
            Constraint::Length(14),
        ],
    }
}

pub fn item_table(snapshot: &DashboardSnapshot) -> TableData {
    TableData {
        title: "Item Performance".to_string(),
        headers: vec!["Category", "Item", "Items Sold", "Revenue"],
        rows: snapshot
            .item_performance
            .iter()
            .map(|i| {
                vec![
                    i.category.clone(),
                    i.item.clone(),
                    format_items(i.total_quantity),
                    format_currency(i.total_revenue),
                ]
            })
            .collect(),
        total: None,
        widths: vec![
            Constraint::Length(14),
            Constraint::Min(16),
            Constraint::Length(14),
            Constraint::Length(16),
        ],
    }
}

pub fn weekday_table(snapshot: &DashboardSnapshot) -> TableData {
    TableData {
        title: "Orders by Weekday".to_string(),
        headers: vec!["Weekday", "Orders"],
        rows: snapshot
            .orders_by_weekday
            .iter()
            .map(|w| vec![w.weekday.clone(), format_number(w.total_orders as f64, 0)])
            .collect(),
        total: None,
        widths: vec![Constraint::Min(10), Constraint::Length(10)],
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render `table` into `area`, or the no-data placeholder when it is empty.
pub fn render_table_view(frame: &mut Frame, area: Rect, table: &TableData, theme: &Theme) {
    if table.is_empty() {
        render_no_data(frame, area, &table.title, NO_DATA_MESSAGE, theme);
        return;
    }

    let header = Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| Row::new(row.iter().cloned().map(Cell::from)).style(theme.row_style(i)))
        .collect();

    if let Some(total) = &table.total {
        rows.push(Row::new(total.iter().cloned().map(Cell::from)).style(theme.table_total));
    }

    let widget = Table::new(rows, table.widths.clone())
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", table.title)),
        )
        .style(theme.text);

    frame.render_widget(widget, area);
}

/// Bordered placeholder with a single warning line.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, message: &str, theme: &Theme) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.warning)),
    ]);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
