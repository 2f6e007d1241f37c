use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// English month names indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English weekday names in calendar order (Monday first).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Columns every sales source must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "order_id",
    "cust_id",
    "category",
    "item",
    "quantity",
    "order_total",
    "order_date",
];

/// Calendar attributes derived once from an order timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFields {
    /// Calendar day of the order.
    pub day: NaiveDate,
    /// English weekday name, e.g. `"Monday"`.
    pub weekday: String,
    /// ISO 8601 week number (1–53).
    pub week: u32,
    /// Month number (1–12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl CalendarFields {
    /// Derive all calendar fields from `ts`.
    ///
    /// Pure: the same timestamp always yields the same fields.
    pub fn derive(ts: &NaiveDateTime) -> Self {
        let day = ts.date();
        Self {
            day,
            weekday: weekday_name(day.weekday()).to_string(),
            week: day.iso_week().week(),
            month: day.month(),
            year: day.year(),
        }
    }
}

/// One row of the sales dataset: a single item/quantity within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Order this line belongs to. An order may span several lines.
    pub order_id: String,
    /// Customer who placed the order.
    pub cust_id: String,
    /// Menu category, e.g. `"Drinks"`.
    pub category: String,
    /// Menu item name.
    pub item: String,
    /// Units of `item` on this line.
    pub quantity: u64,
    /// Currency amount for this line.
    pub order_total: f64,
    /// Timestamp the order was placed.
    pub order_date: NaiveDateTime,
    /// Calendar fields derived from `order_date` at load time.
    pub calendar: CalendarFields,
}

impl OrderLine {
    /// Build a line and derive its calendar fields from `order_date`.
    pub fn new(
        order_id: impl Into<String>,
        cust_id: impl Into<String>,
        category: impl Into<String>,
        item: impl Into<String>,
        quantity: u64,
        order_total: f64,
        order_date: NaiveDateTime,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            cust_id: cust_id.into(),
            category: category.into(),
            item: item.into(),
            quantity,
            order_total,
            calendar: CalendarFields::derive(&order_date),
            order_date,
        }
    }

    pub fn weekday(&self) -> &str {
        &self.calendar.weekday
    }

    pub fn year(&self) -> i32 {
        self.calendar.year
    }

    pub fn month(&self) -> u32 {
        self.calendar.month
    }

    pub fn day(&self) -> NaiveDate {
        self.calendar.day
    }
}

/// English name for `weekday`.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Position of `name` in the Monday-first week, or `None` if unknown.
pub fn weekday_index(name: &str) -> Option<usize> {
    WEEKDAY_NAMES.iter().position(|w| *w == name)
}

/// English name for month `month` (1–12).
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}

/// Month number (1–12) for an English month name, case-insensitive.
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name.trim()))
        .map(|idx| idx as u32 + 1)
}

/// Ordering for order / customer identifiers.
///
/// Integer-looking ids compare numerically so `"9"` sorts before `"10"`;
/// anything else falls back to plain string order. Numeric ids sort before
/// non-numeric ones.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_calendar_fields_derive() {
        // 2023-01-02 is a Monday in ISO week 1.
        let fields = CalendarFields::derive(&ts("2023-01-02 09:30:00"));
        assert_eq!(fields.day, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
        assert_eq!(fields.weekday, "Monday");
        assert_eq!(fields.week, 1);
        assert_eq!(fields.month, 1);
        assert_eq!(fields.year, 2023);
    }

    #[test]
    fn test_calendar_fields_iso_week_crosses_year() {
        // 2022-01-01 (Saturday) belongs to ISO week 52 of 2021.
        let fields = CalendarFields::derive(&ts("2022-01-01 12:00:00"));
        assert_eq!(fields.week, 52);
        assert_eq!(fields.year, 2022);
        assert_eq!(fields.weekday, "Saturday");
    }

    #[test]
    fn test_calendar_fields_idempotent() {
        let t = ts("2022-08-13 18:03:00");
        assert_eq!(CalendarFields::derive(&t), CalendarFields::derive(&t));
    }

    #[test]
    fn test_order_line_new_derives_calendar() {
        let line = OrderLine::new("1", "7", "Drinks", "Tea", 2, 10.0, ts("2022-08-14 08:00:00"));
        assert_eq!(line.weekday(), "Sunday");
        assert_eq!(line.year(), 2022);
        assert_eq!(line.month(), 8);
        assert_eq!(line.day(), NaiveDate::from_ymd_opt(2022, 8, 14).unwrap());
    }

    #[test]
    fn test_month_name_and_number() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_number("March"), Some(3));
        assert_eq!(month_number("march"), Some(3));
        assert_eq!(month_number("Smarch"), None);
    }

    #[test]
    fn test_weekday_index() {
        assert_eq!(weekday_index("Monday"), Some(0));
        assert_eq!(weekday_index("Sunday"), Some(6));
        assert_eq!(weekday_index("Funday"), None);
    }

    #[test]
    fn test_compare_ids_numeric() {
        assert_eq!(compare_ids("9", "10"), Ordering::Less);
        assert_eq!(compare_ids("10", "10"), Ordering::Equal);
        assert_eq!(compare_ids("100", "20"), Ordering::Greater);
    }

    #[test]
    fn test_compare_ids_mixed_and_text() {
        assert_eq!(compare_ids("5", "A"), Ordering::Less);
        assert_eq!(compare_ids("B", "A"), Ordering::Greater);
        assert_eq!(compare_ids("A", "A"), Ordering::Equal);
    }
}
