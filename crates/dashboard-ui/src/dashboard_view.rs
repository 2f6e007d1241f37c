//! Full-screen dashboard layout: header, page tabs, filter sidebar, the
//! active page and a key-help footer.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use dashboard_core::formatting::{format_average, format_currency, format_items, format_number};
use dashboard_data::analysis::DashboardSnapshot;
use dashboard_data::filter::FilterSelection;

use crate::chart_view::{
    category_revenue_bars, render_bar_chart, render_daily_revenue, weekday_order_bars,
};
use crate::components::header::Header;
use crate::components::selector::MultiSelect;
use crate::table_view::{
    category_table, item_table, most_loyal_table, render_no_data, render_table_view,
    top_spenders_table, weekday_table, NO_DATA_MESSAGE,
};
use crate::themes::Theme;

/// Width of the filter sidebar.
const SIDEBAR_WIDTH: u16 = 26;

pub const KEY_HELP: &str =
    "Tab/S-Tab page  c/w filter  ↑↓ move  Space toggle  a all  n none  y year  [ ] month  q quit";

// ── Page ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Overview,
    Customers,
    Items,
    Trends,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Overview, Page::Customers, Page::Items, Page::Trends];

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Customers => "Customers",
            Page::Items => "Items",
            Page::Trends => "Trends",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which filter list receives ↑/↓/Space/a/n.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    None,
    Categories,
    Weekdays,
}

// ── DashboardView ─────────────────────────────────────────────────────────────

/// Everything needed to draw one frame.
pub struct DashboardView<'a> {
    pub snapshot: &'a DashboardSnapshot,
    pub source: &'a str,
    pub page: Page,
    pub categories: &'a [String],
    pub weekdays: &'a [String],
    pub selection: &'a FilterSelection,
    pub focus: Focus,
    pub category_cursor: usize,
    pub weekday_cursor: usize,
    /// Trend panel that `[`/`]` act on.
    pub active_year: Option<i32>,
    pub theme: &'a Theme,
}

impl<'a> DashboardView<'a> {
    pub fn render(&self, frame: &mut Frame) {
        let [header_area, tabs_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(Header::HEIGHT),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(
            self.source,
            self.snapshot.metadata.total_rows,
            self.snapshot.metadata.filtered_rows,
            self.theme,
        );
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        let tabs = Tabs::new(Page::ALL.iter().map(|p| p.title()))
            .select(self.page.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .divider("|")
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border),
            );
        frame.render_widget(tabs, tabs_area);

        let [sidebar_area, content_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .areas(body_area);
        self.render_sidebar(frame, sidebar_area);

        match self.page {
            Page::Overview => self.render_overview(frame, content_area),
            Page::Customers => self.render_customers(frame, content_area),
            Page::Items => render_table_view(
                frame,
                content_area,
                &item_table(self.snapshot),
                self.theme,
            ),
            Page::Trends => self.render_trends(frame, content_area),
        }

        frame.render_widget(
            Paragraph::new(Span::styled(KEY_HELP, self.theme.dim)),
            footer_area,
        );
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let weekday_height = self.weekdays.len() as u16 + 2;
        let [categories_area, weekdays_area] =
            Layout::vertical([Constraint::Min(4), Constraint::Length(weekday_height)]).areas(area);

        MultiSelect {
            title: "Categories",
            options: self.categories,
            selected: &self.selection.categories,
            cursor: (self.focus == Focus::Categories).then_some(self.category_cursor),
            theme: self.theme,
        }
        .render(frame, categories_area);

        MultiSelect {
            title: "Weekdays",
            options: self.weekdays,
            selected: &self.selection.weekdays,
            cursor: (self.focus == Focus::Weekdays).then_some(self.weekday_cursor),
            theme: self.theme,
        }
        .render(frame, weekdays_area);
    }

    fn render_overview(&self, frame: &mut Frame, area: Rect) {
        let [kpi_area, category_area, weekday_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Percentage(55),
            Constraint::Min(0),
        ])
        .areas(area);

        let kpis = &self.snapshot.kpis;
        let kpi_cells = [
            ("Total Revenue", format_currency(kpis.total_revenue)),
            ("Items Sold", format_items(kpis.total_items_sold)),
            ("Avg Order Value", format_average(kpis.average_order_value)),
        ];
        let kpi_areas = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(kpi_area);
        for ((label, value), cell_area) in kpi_cells.into_iter().zip(kpi_areas.iter()) {
            frame.render_widget(
                Paragraph::new(Span::styled(value, self.theme.value)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(self.theme.table_border)
                        .title(Span::styled(format!(" {} ", label), self.theme.label)),
                ),
                *cell_area,
            );
        }

        let [table_area, chart_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Min(0)])
                .areas(category_area);
        render_table_view(frame, table_area, &category_table(self.snapshot), self.theme);
        render_bar_chart(
            frame,
            chart_area,
            "Revenue by Category",
            &category_revenue_bars(self.snapshot),
            self.theme,
        );

        let [table_area, chart_area] =
            Layout::horizontal([Constraint::Length(28), Constraint::Min(0)]).areas(weekday_area);
        render_table_view(frame, table_area, &weekday_table(self.snapshot), self.theme);
        render_bar_chart(
            frame,
            chart_area,
            "Orders by Weekday",
            &weekday_order_bars(self.snapshot),
            self.theme,
        );
    }

    fn render_customers(&self, frame: &mut Frame, area: Rect) {
        let [callout_area, tables_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

        let top = self
            .snapshot
            .top_spender()
            .map(|c| format!("{} ({})", c.cust_id, format_currency(c.total_spent)));
        let loyal = self.snapshot.most_loyal_customer().map(|c| {
            format!(
                "{} ({} orders)",
                c.cust_id,
                format_number(c.total_orders as f64, 0)
            )
        });
        let callout_line = |label: &'static str, value: Option<String>| {
            Line::from(vec![
                Span::styled(label, self.theme.label),
                match value {
                    Some(v) => Span::styled(v, self.theme.value),
                    None => Span::styled("no data", self.theme.dim),
                },
            ])
        };
        frame.render_widget(
            Paragraph::new(vec![
                callout_line("Top Spender:          ", top),
                callout_line("Most Loyal Customer:  ", loyal),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border)
                    .title(" Highlights "),
            ),
            callout_area,
        );

        let [left, right] =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
                .areas(tables_area);
        render_table_view(frame, left, &top_spenders_table(self.snapshot), self.theme);
        render_table_view(frame, right, &most_loyal_table(self.snapshot), self.theme);
    }

    fn render_trends(&self, frame: &mut Frame, area: Rect) {
        let panels = &self.snapshot.year_panels;
        if panels.is_empty() {
            render_no_data(frame, area, "Daily Revenue", NO_DATA_MESSAGE, self.theme);
            return;
        }

        let constraints = vec![Constraint::Ratio(1, panels.len() as u32); panels.len()];
        let areas = Layout::vertical(constraints).split(area);
        for (panel, panel_area) in panels.iter().zip(areas.iter()) {
            let focused = self.active_year == Some(panel.year);
            render_daily_revenue(frame, *panel_area, panel, focused, self.theme);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
