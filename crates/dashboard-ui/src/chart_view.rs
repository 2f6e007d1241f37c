//! Bar and line charts: category revenue, weekday orders and the daily
//! revenue trend panels.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset as ChartDataset, GraphType,
    },
    Frame,
};

use dashboard_core::formatting::{format_compact, format_currency};
use dashboard_data::analysis::{DashboardSnapshot, YearPanel};

use crate::components::selector::month_picker_line;
use crate::table_view::{render_no_data, NO_DATA_MESSAGE};
use crate::themes::Theme;

/// Placeholder for a trend panel whose month has no orders.
pub const NO_MONTH_DATA_MESSAGE: &str = "No data available for this month.";

/// A labelled bar value.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
}

pub fn category_revenue_bars(snapshot: &DashboardSnapshot) -> Vec<BarPoint> {
    snapshot
        .revenue_by_category
        .iter()
        .map(|r| BarPoint {
            label: r.category.clone(),
            value: r.total_revenue,
        })
        .collect()
}

pub fn weekday_order_bars(snapshot: &DashboardSnapshot) -> Vec<BarPoint> {
    snapshot
        .orders_by_weekday
        .iter()
        .map(|w| BarPoint {
            // Three-letter labels keep seven bars on a narrow terminal.
            label: w.weekday.chars().take(3).collect(),
            value: w.total_orders as f64,
        })
        .collect()
}

/// Vertical bar chart with compact value labels.
pub fn render_bar_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    points: &[BarPoint],
    theme: &Theme,
) {
    if points.is_empty() {
        render_no_data(frame, area, title, NO_DATA_MESSAGE, theme);
        return;
    }

    let bars: Vec<Bar> = points
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.value.max(0.0).round() as u64)
                .text_value(format_compact(p.value, 3))
                .label(Line::from(p.label.clone()))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let bar_width = bar_width_for(inner_width, points.len());

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(theme.bar)
        .value_style(theme.bar_value)
        .label_style(theme.label);

    frame.render_widget(chart, area);
}

/// Widest bar (≥ 3 columns) that fits `count` bars with one-column gaps.
pub fn bar_width_for(inner_width: u16, count: usize) -> u16 {
    if count == 0 {
        return 3;
    }
    let count = count as u16;
    let gaps = count.saturating_sub(1);
    (inner_width.saturating_sub(gaps) / count).clamp(3, 12)
}

/// Daily revenue line chart for one year panel.
///
/// The block title carries the month picker; an empty selection renders
/// the "no data for this month" placeholder.
pub fn render_daily_revenue(
    frame: &mut Frame,
    area: Rect,
    panel: &YearPanel,
    focused: bool,
    theme: &Theme,
) {
    let mut title = vec![Span::styled(
        format!(" Daily Revenue {} ", panel.year),
        theme.header,
    )];
    title.extend(month_picker_line(&panel.selected_month.to_string(), focused, theme).spans);
    title.push(Span::raw(" "));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(Line::from(title));

    let points = panel.series.points();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        let message = ratatui::widgets::Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(NO_MONTH_DATA_MESSAGE, theme.warning)),
        ])
        .block(block);
        frame.render_widget(message, area);
        return;
    };

    let origin = first.day;
    let data: Vec<(f64, f64)> = points
        .iter()
        .map(|p| ((p.day - origin).num_days() as f64, p.daily_revenue))
        .collect();

    let x_max = ((last.day - origin).num_days() as f64).max(1.0);
    let y_max = points
        .iter()
        .map(|p| p.daily_revenue)
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;

    let x_labels = vec![
        origin.format("%Y-%m-%d").to_string(),
        last.day.format("%Y-%m-%d").to_string(),
    ];
    let y_labels = vec![
        format_currency(0.0),
        format_currency(y_max / 2.0),
        format_currency(y_max),
    ];

    let series = ChartDataset::default()
        .name("revenue")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.line_series)
        .data(&data);

    let chart = Chart::new(vec![series])
        .block(block)
        .x_axis(axis(theme.axis, [0.0, x_max], x_labels))
        .y_axis(axis(theme.axis, [0.0, y_max], y_labels));

    frame.render_widget(chart, area);
}

fn axis<'a>(style: Style, bounds: [f64; 2], labels: Vec<String>) -> Axis<'a> {
    Axis::default().style(style).bounds(bounds).labels(labels)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use dashboard_data::analysis::{build_snapshot, DashboardRequest};
    use dashboard_data::core::models::OrderLine;
    use dashboard_data::dataset::Dataset;
    use dashboard_data::filter::MonthFilter;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn snapshot(request: impl Fn(&Dataset) -> DashboardRequest) -> DashboardSnapshot {
        let ts = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
        let ds = Dataset::from_lines(
            vec![
                OrderLine::new("1", "A", "Drinks", "Tea", 2, 10.0, ts("2023-01-02 10:00:00")),
                OrderLine::new("2", "A", "Food", "Burger", 1, 20.0, ts("2023-01-09 12:00:00")),
                OrderLine::new("3", "B", "Drinks", "Coffee", 1, 5.0, ts("2023-03-03 09:00:00")),
            ],
            "test",
        );
        build_snapshot(&ds, &request(&ds))
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_bar_points() {
        let snap = snapshot(DashboardRequest::full);
        let bars = category_revenue_bars(&snap);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Drinks");
        assert!((bars[0].value - 15.0).abs() < 1e-9);

        let days = weekday_order_bars(&snap);
        assert_eq!(days[0].label, "Mon");
        assert!((days[0].value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_bar_width_for() {
        assert_eq!(bar_width_for(40, 0), 3);
        assert_eq!(bar_width_for(40, 7), 4);
        assert_eq!(bar_width_for(200, 2), 12);
        assert_eq!(bar_width_for(5, 7), 3);
    }

    #[test]
    fn test_render_bar_chart() {
        let mut terminal = Terminal::new(TestBackend::new(60, 15)).unwrap();
        let theme = Theme::dark();
        let snap = snapshot(DashboardRequest::full);
        let bars = category_revenue_bars(&snap);
        terminal
            .draw(|frame| render_bar_chart(frame, frame.area(), "Revenue", &bars, &theme))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Revenue"));
        assert!(text.contains("Drinks"));
    }

    #[test]
    fn test_render_empty_bar_chart() {
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_bar_chart(frame, frame.area(), "Revenue", &[], &theme))
            .unwrap();
        assert!(buffer_text(&terminal).contains(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_render_daily_revenue_series() {
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        let theme = Theme::dark();
        let snap = snapshot(DashboardRequest::full);
        let panel = snap.year_panel(2023).unwrap().clone();
        terminal
            .draw(|frame| render_daily_revenue(frame, frame.area(), &panel, true, &theme))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Daily Revenue 2023"));
        assert!(text.contains("All Months"));
        assert!(!text.contains(NO_MONTH_DATA_MESSAGE));
    }

    #[test]
    fn test_render_daily_revenue_single_point() {
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        let theme = Theme::classic();
        let snap =
            snapshot(|ds| DashboardRequest::full(ds).with_month(2023, MonthFilter::Month(3)));
        let panel = snap.year_panel(2023).unwrap().clone();
        assert_eq!(panel.series.points().len(), 1);
        terminal
            .draw(|frame| render_daily_revenue(frame, frame.area(), &panel, false, &theme))
            .unwrap();
        assert!(buffer_text(&terminal).contains("March"));
    }

    #[test]
    fn test_render_daily_revenue_no_data() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let theme = Theme::dark();
        let panel = YearPanel {
            year: 2022,
            month_options: vec![MonthFilter::AllMonths],
            selected_month: MonthFilter::AllMonths,
            series: dashboard_data::aggregator::DailyRevenueSeries::NoData,
        };
        terminal
            .draw(|frame| render_daily_revenue(frame, frame.area(), &panel, false, &theme))
            .unwrap();
        assert!(buffer_text(&terminal).contains(NO_MONTH_DATA_MESSAGE));
    }
}
