use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time patterns tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only patterns; the parsed value is placed at midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses `order_date` strings from the sales CSV.
pub struct TimestampParser;

impl TimestampParser {
    /// Parse `s` into a naive wall-clock timestamp.
    ///
    /// Handles:
    /// * RFC 3339 / ISO 8601 with an offset or `Z` suffix. The local
    ///   wall-clock value is kept so the derived calendar day matches the
    ///   day written in the source.
    /// * `YYYY-MM-DD HH:MM[:SS[.fff]]` with a space or `T` separator.
    /// * US-style `MM/DD/YYYY HH:MM[:SS]`.
    /// * Date-only `YYYY-MM-DD` and `MM/DD/YYYY` (midnight).
    ///
    /// Returns `None` for empty or unrecognised input.
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
