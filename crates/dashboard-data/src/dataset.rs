//! The immutable in-memory sales dataset.

use std::collections::{BTreeSet, HashSet};

use dashboard_core::models::OrderLine;

/// All order lines of one source plus their distinct category, weekday and
/// year domains.
///
/// Built once at load time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    lines: Vec<OrderLine>,
    categories: Vec<String>,
    weekdays: Vec<String>,
    years: Vec<i32>,
    source: String,
}

impl Dataset {
    /// Build a dataset from already-parsed lines.
    ///
    /// Category and weekday domains keep the order of first appearance;
    /// years are ascending.
    pub fn from_lines(lines: Vec<OrderLine>, source: impl Into<String>) -> Self {
        let categories = distinct_in_order(lines.iter().map(|l| l.category.as_str()));
        let weekdays = distinct_in_order(lines.iter().map(|l| l.weekday()));
        let years: BTreeSet<i32> = lines.iter().map(|l| l.year()).collect();

        Self {
            lines,
            categories,
            weekdays,
            years: years.into_iter().collect(),
            source: source.into(),
        }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distinct weekday names in order of first appearance.
    pub fn weekdays(&self) -> &[String] {
        &self.weekdays
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Human-readable description of where the data came from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn line(order: &str, category: &str, ts: &str) -> OrderLine {
        let ts = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
        OrderLine::new(order, "1", category, "item", 1, 1.0, ts)
    }

    #[test]
    fn test_domains_keep_first_appearance_order() {
        let ds = Dataset::from_lines(
            vec![
                line("1", "Main", "2023-01-03 10:00:00"),
                line("2", "Drinks", "2022-01-02 10:00:00"),
                line("3", "Main", "2023-01-02 10:00:00"),
            ],
            "test",
        );
        assert_eq!(ds.categories(), &["Main".to_string(), "Drinks".to_string()]);
        assert_eq!(
            ds.weekdays(),
            &["Tuesday".to_string(), "Sunday".to_string(), "Monday".to_string()]
        );
        assert_eq!(ds.years(), &[2022, 2023]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.source(), "test");
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::from_lines(vec![], "empty");
        assert!(ds.is_empty());
        assert!(ds.categories().is_empty());
        assert!(ds.years().is_empty());
    }
}
