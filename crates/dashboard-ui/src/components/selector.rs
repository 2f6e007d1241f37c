//! Filter controls: multi-select lists for categories and weekdays, and the
//! single-select month picker used by the trend panels.

use std::collections::BTreeSet;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

/// Cursor over a fixed list of options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCursor {
    position: usize,
}

impl ListCursor {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if self.position + 1 < len {
            self.position += 1;
        }
    }

    /// The option under the cursor, if the list is non-empty.
    pub fn current<'o>(&self, options: &'o [String]) -> Option<&'o str> {
        options.get(self.position).map(String::as_str)
    }
}

/// A bordered multi-select list.
pub struct MultiSelect<'a> {
    pub title: &'a str,
    pub options: &'a [String],
    pub selected: &'a BTreeSet<String>,
    /// Cursor row, shown only while the list has focus.
    pub cursor: Option<usize>,
    pub theme: &'a Theme,
}

impl<'a> MultiSelect<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let focused = self.cursor.is_some();
        let inner_width = area.width.saturating_sub(2) as usize;
        let visible = area.height.saturating_sub(2) as usize;
        let offset = scroll_offset(self.cursor.unwrap_or(0), visible);

        let lines: Vec<Line> = self
            .options
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, option)| {
                let checked = self.selected.contains(option);
                let marker = if checked { "[x] " } else { "[ ] " };
                let label = truncate_to_width(option, inner_width.saturating_sub(marker.len()));
                let style = if self.cursor == Some(i) {
                    self.theme.cursor
                } else if checked {
                    self.theme.text
                } else {
                    self.theme.dim
                };
                Line::from(vec![
                    Span::styled(marker, self.theme.label),
                    Span::styled(label, style),
                ])
            })
            .collect();

        let title = format!(
            " {} ({}/{}) ",
            self.title,
            self.selected
                .iter()
                .filter(|s| self.options.contains(*s))
                .count(),
            self.options.len()
        );

        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style(focused))
                    .title(title),
            ),
            area,
        );
    }
}

/// Single-line month picker, e.g. `◀ March ▶`.
pub fn month_picker_line<'a>(label: &str, focused: bool, theme: &Theme) -> Line<'a> {
    let arrow_style = if focused { theme.focus_border } else { theme.dim };
    Line::from(vec![
        Span::styled("◀ ", arrow_style),
        Span::styled(label.to_string(), theme.value),
        Span::styled(" ▶", arrow_style),
    ])
}

/// Cut `text` to at most `max_width` terminal columns, ending in `…` when
/// shortened.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// First visible row so that `cursor` stays inside a window of `visible`
/// rows.
fn scroll_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        0
    } else {
        cursor.saturating_sub(visible - 1)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
