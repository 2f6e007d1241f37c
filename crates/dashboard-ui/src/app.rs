//! Application state and TUI event loop for the sales dashboard.
//!
//! [`App`] owns the [`DashboardSession`], the latest snapshot and the UI
//! navigation state. Key handling is separated from the terminal loop so it
//! can be driven directly in tests.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use dashboard_data::analysis::DashboardSnapshot;
use dashboard_runtime::session::DashboardSession;

use crate::components::selector::ListCursor;
use crate::dashboard_view::{DashboardView, Focus, Page};
use crate::themes::Theme;

/// How long to wait for a key before redrawing.
const TICK_RATE: Duration = Duration::from_millis(250);

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    session: DashboardSession,
    snapshot: DashboardSnapshot,
    page: Page,
    focus: Focus,
    category_cursor: ListCursor,
    weekday_cursor: ListCursor,
    /// Index into the dataset's years for the active trend panel.
    year_index: usize,
    should_quit: bool,
}

impl App {
    pub fn new(session: DashboardSession, theme_name: &str) -> Self {
        let snapshot = session.snapshot();
        Self {
            theme: Theme::from_name(theme_name),
            session,
            snapshot,
            page: Page::default(),
            focus: Focus::default(),
            category_cursor: ListCursor::default(),
            weekday_cursor: ListCursor::default(),
            year_index: 0,
            should_quit: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Year of the trend panel that month keys act on.
    pub fn active_year(&self) -> Option<i32> {
        self.session.dataset().years().get(self.year_index).copied()
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive dashboard until `q` or `Ctrl+C`.
    ///
    /// Terminal state is restored even when drawing or input fails.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            // Let the ctrl-c watcher and other tasks make progress.
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press to the dashboard state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,

            KeyCode::Tab => self.page = self.page.next(),
            KeyCode::BackTab => self.page = self.page.prev(),

            KeyCode::Char('c') => self.toggle_focus(Focus::Categories),
            KeyCode::Char('w') => self.toggle_focus(Focus::Weekdays),
            KeyCode::Esc => self.focus = Focus::None,

            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::Char(' ') => self.toggle_under_cursor(),
            KeyCode::Char('a') => self.select_all(),
            KeyCode::Char('n') => self.select_none(),

            KeyCode::Char('y') => self.next_year(),
            KeyCode::Char('[') => self.cycle_month(false),
            KeyCode::Char(']') => self.cycle_month(true),
            _ => {}
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let dataset = self.session.dataset();
        let view = DashboardView {
            snapshot: &self.snapshot,
            source: dataset.source(),
            page: self.page,
            categories: dataset.categories(),
            weekdays: dataset.weekdays(),
            selection: self.session.selection(),
            focus: self.focus,
            category_cursor: self.category_cursor.position(),
            weekday_cursor: self.weekday_cursor.position(),
            active_year: self.active_year(),
            theme: &self.theme,
        };
        view.render(frame);
    }

    fn refresh(&mut self) {
        self.snapshot = self.session.snapshot();
        tracing::debug!(
            filtered_rows = self.snapshot.metadata.filtered_rows,
            "snapshot refreshed"
        );
    }

    fn toggle_focus(&mut self, target: Focus) {
        self.focus = if self.focus == target {
            Focus::None
        } else {
            target
        };
    }

    fn move_cursor(&mut self, down: bool) {
        let dataset = self.session.dataset();
        let (cursor, len) = match self.focus {
            Focus::Categories => (&mut self.category_cursor, dataset.categories().len()),
            Focus::Weekdays => (&mut self.weekday_cursor, dataset.weekdays().len()),
            Focus::None => return,
        };
        if down {
            cursor.down(len);
        } else {
            cursor.up();
        }
    }

    fn toggle_under_cursor(&mut self) {
        let dataset = self.session.dataset();
        let target = match self.focus {
            Focus::Categories => self.category_cursor.current(dataset.categories()),
            Focus::Weekdays => self.weekday_cursor.current(dataset.weekdays()),
            Focus::None => None,
        }
        .map(str::to_owned);

        let Some(value) = target else {
            return;
        };
        match self.focus {
            Focus::Categories => {
                self.session.toggle_category(&value);
            }
            Focus::Weekdays => {
                self.session.toggle_weekday(&value);
            }
            Focus::None => return,
        }
        self.refresh();
    }

    /// Select every value in the focused list, or in both lists when none
    /// has focus.
    fn select_all(&mut self) {
        if self.focus != Focus::Weekdays {
            self.session.select_all_categories();
        }
        if self.focus != Focus::Categories {
            self.session.select_all_weekdays();
        }
        self.refresh();
    }

    fn select_none(&mut self) {
        if self.focus != Focus::Weekdays {
            self.session.clear_categories();
        }
        if self.focus != Focus::Categories {
            self.session.clear_weekdays();
        }
        self.refresh();
    }

    fn next_year(&mut self) {
        let years = self.session.dataset().years().len();
        if years > 0 {
            self.year_index = (self.year_index + 1) % years;
        }
    }

    fn cycle_month(&mut self, forward: bool) {
        if let Some(year) = self.active_year() {
            self.session.cycle_month(year, forward);
            self.refresh();
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use dashboard_data::core::models::OrderLine;
    use dashboard_data::dataset::Dataset;
    use dashboard_data::filter::MonthFilter;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn app() -> App {
        let ts = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
        let ds = Dataset::from_lines(
            vec![
                OrderLine::new("1", "A", "Drinks", "Tea", 2, 10.0, ts("2022-06-06 10:00:00")),
                OrderLine::new("2", "A", "Food", "Burger", 1, 20.0, ts("2023-01-02 12:00:00")),
                OrderLine::new("3", "B", "Drinks", "Coffee", 1, 5.0, ts("2023-02-07 09:00:00")),
            ],
            "test",
        );
        App::new(DashboardSession::new(Arc::new(ds)), "dark")
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    // ── quitting ──────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut a = app();
        press(&mut a, KeyCode::Char('q'));
        assert!(a.should_quit());

        let mut b = app();
        b.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(b.should_quit());
        assert_eq!(b.focus(), Focus::None);
    }

    // ── navigation ────────────────────────────────────────────────────────────

    #[test]
    fn test_tab_cycles_pages() {
        let mut a = app();
        assert_eq!(a.page(), Page::Overview);
        press(&mut a, KeyCode::Tab);
        assert_eq!(a.page(), Page::Customers);
        press(&mut a, KeyCode::BackTab);
        press(&mut a, KeyCode::BackTab);
        assert_eq!(a.page(), Page::Trends);
    }

    #[test]
    fn test_focus_toggle() {
        let mut a = app();
        press(&mut a, KeyCode::Char('c'));
        assert_eq!(a.focus(), Focus::Categories);
        press(&mut a, KeyCode::Char('w'));
        assert_eq!(a.focus(), Focus::Weekdays);
        press(&mut a, KeyCode::Char('w'));
        assert_eq!(a.focus(), Focus::None);
        press(&mut a, KeyCode::Char('c'));
        press(&mut a, KeyCode::Esc);
        assert_eq!(a.focus(), Focus::None);
    }

    // ── filtering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_space_toggles_category_under_cursor() {
        let mut a = app();
        press(&mut a, KeyCode::Char('c'));
        press(&mut a, KeyCode::Down);
        // Cursor on "Food".
        press(&mut a, KeyCode::Char(' '));
        assert!(!a.session().selection().categories.contains("Food"));
        assert!((a.snapshot().kpis.total_revenue - 15.0).abs() < 1e-9);

        press(&mut a, KeyCode::Char(' '));
        assert!((a.snapshot().kpis.total_revenue - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_space_without_focus_is_noop() {
        let mut a = app();
        press(&mut a, KeyCode::Char(' '));
        assert_eq!(a.snapshot().metadata.filtered_rows, 3);
    }

    #[test]
    fn test_none_and_all_on_focused_list() {
        let mut a = app();
        press(&mut a, KeyCode::Char('w'));
        press(&mut a, KeyCode::Char('n'));
        assert!(a.session().selection().weekdays.is_empty());
        assert!(!a.session().selection().categories.is_empty());
        assert!(a.snapshot().is_empty());

        press(&mut a, KeyCode::Char('a'));
        assert_eq!(a.snapshot().metadata.filtered_rows, 3);
    }

    #[test]
    fn test_none_without_focus_clears_both() {
        let mut a = app();
        press(&mut a, KeyCode::Char('n'));
        assert!(a.session().selection().weekdays.is_empty());
        assert!(a.session().selection().categories.is_empty());
    }

    // ── years and months ──────────────────────────────────────────────────────

    #[test]
    fn test_year_and_month_keys() {
        let mut a = app();
        assert_eq!(a.active_year(), Some(2022));
        press(&mut a, KeyCode::Char('y'));
        assert_eq!(a.active_year(), Some(2023));

        press(&mut a, KeyCode::Char(']'));
        let panel = a.snapshot().year_panel(2023).unwrap();
        assert_eq!(panel.selected_month, MonthFilter::Month(1));
        assert_eq!(panel.series.points().len(), 1);

        press(&mut a, KeyCode::Char('['));
        press(&mut a, KeyCode::Char('['));
        let panel = a.snapshot().year_panel(2023).unwrap();
        assert_eq!(panel.selected_month, MonthFilter::Month(2));

        press(&mut a, KeyCode::Char('y'));
        assert_eq!(a.active_year(), Some(2022));
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_every_page() {
        let mut a = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        for _ in Page::ALL {
            terminal.draw(|frame| a.render(frame)).unwrap();
            press(&mut a, KeyCode::Tab);
        }
        assert_eq!(a.page(), Page::Overview);
    }

    #[test]
    fn test_render_tiny_terminal() {
        let a = app();
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal.draw(|frame| a.render(frame)).unwrap();
    }
}
