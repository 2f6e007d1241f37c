//! CSV loading for the sales dashboard.
//!
//! Reads the `order_id, cust_id, category, item, quantity, order_total,
//! order_date` schema, parses timestamps and derives the calendar fields
//! for every row.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use dashboard_core::error::LoadError;
use dashboard_core::models::{OrderLine, REQUIRED_COLUMNS};
use dashboard_core::timestamps::TimestampParser;
use serde::Deserialize;
use tracing::debug;

use crate::dataset::Dataset;

/// One CSV row before validation. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    order_id: String,
    cust_id: String,
    category: String,
    item: String,
    quantity: String,
    order_total: String,
    order_date: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and parse the sales CSV at `path`.
///
/// Fails with [`LoadError`] when the file is missing or unreadable, a
/// required column is absent, or any row holds an invalid value. No
/// partial dataset is ever returned.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::DataPathNotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path).map_err(|source| LoadError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let start = Instant::now();
    let dataset = parse_records(std::io::BufReader::new(file), path.display().to_string())?;

    debug!(
        "Loaded {} order lines ({} categories, {} years) from {} in {:.3}s",
        dataset.len(),
        dataset.categories().len(),
        dataset.years().len(),
        path.display(),
        start.elapsed().as_secs_f64(),
    );

    Ok(dataset)
}

/// Parse sales records from any reader, e.g. an in-memory buffer.
pub fn parse_dataset<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    parse_records(reader, "<memory>".to_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn parse_records<R: Read>(reader: R, source: String) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }
    reader.set_headers(headers);

    let mut lines = Vec::new();
    for (idx, record) in reader.deserialize::<RawRecord>().enumerate() {
        let row = idx + 1;
        lines.push(to_order_line(record?, row)?);
    }

    Ok(Dataset::from_lines(lines, source))
}

/// Validate a raw row and derive its calendar fields.
///
/// `row` is the 1-based data row number used in error messages.
fn to_order_line(raw: RawRecord, row: usize) -> Result<OrderLine, LoadError> {
    let quantity = parse_quantity(&raw.quantity, row)?;
    let order_total = parse_non_negative(&raw.order_total, "order_total", row)?;
    let order_date =
        TimestampParser::parse(&raw.order_date).ok_or_else(|| LoadError::TimestampParse {
            row,
            value: raw.order_date.clone(),
        })?;

    Ok(OrderLine::new(
        raw.order_id,
        raw.cust_id,
        raw.category,
        raw.item,
        quantity,
        order_total,
        order_date,
    ))
}

/// Quantities such as `"2.0"` are accepted and truncated. Values that do not
/// fit in a `u64` are rejected rather than clamped.
fn parse_quantity(value: &str, row: usize) -> Result<u64, LoadError> {
    let quantity = parse_non_negative(value, "quantity", row)?.trunc();
    // u64::MAX as f64 rounds up to 2^64, which is already out of range.
    if quantity >= u64::MAX as f64 {
        return Err(LoadError::InvalidField {
            row,
            column: "quantity",
            value: value.to_string(),
        });
    }
    Ok(quantity as u64)
}

fn parse_non_negative(value: &str, column: &'static str, row: usize) -> Result<f64, LoadError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(LoadError::InvalidField {
            row,
            column,
            value: value.to_string(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "order_id,cust_id,category,item,quantity,order_total,order_date";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn parse(text: &str) -> Result<Dataset, LoadError> {
        parse_dataset(text.as_bytes())
    }

    // ── load_dataset ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_dataset_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "restaurant_data.csv",
            &[
                HEADER,
                "1,100,Drinks,Iced Tea,2,10.00,2023-01-02 12:00:00",
                "1,100,Main,Burger,1,20.00,2023-01-02 12:00:00",
            ],
        );

        let ds = load_dataset(&path).unwrap();
        assert_eq!(ds.len(), 2);
        let first = &ds.lines()[0];
        assert_eq!(first.order_id, "1");
        assert_eq!(first.cust_id, "100");
        assert_eq!(first.item, "Iced Tea");
        assert_eq!(first.quantity, 2);
        assert!((first.order_total - 10.0).abs() < 1e-9);
        assert_eq!(first.weekday(), "Monday");
        assert_eq!(first.day(), NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
        assert!(ds.source().ends_with("restaurant_data.csv"));
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_dataset(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::DataPathNotFound(_)));
    }

    #[test]
    fn test_load_dataset_directory_is_unreadable() {
        let dir = TempDir::new().unwrap();
        // A directory exists but is not a readable CSV file.
        let result = load_dataset(dir.path());
        assert!(result.is_err());
    }

    // ── parse_dataset ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_header_only_is_empty_dataset() {
        let ds = parse(&format!("{HEADER}\n")).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_parse_missing_columns_lists_all() {
        let err = parse("order_id,category,item,quantity,order_total\n1,A,B,1,1.0\n").unwrap_err();
        match err {
            LoadError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["cust_id".to_string(), "order_date".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_extra_columns_and_order_ignored() {
        let text = "\u{feff}order_date , note,order_total,quantity,item,category,cust_id,order_id\n\
                    2022-05-01 09:00:00,hello,4.50,3,Latte,Drinks,7,42\n";
        let ds = parse(text).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.lines()[0].order_id, "42");
        assert_eq!(ds.lines()[0].quantity, 3);
    }

    #[test]
    fn test_parse_bad_timestamp_reports_row() {
        let text = format!("{HEADER}\n1,1,A,B,1,1.0,2023-01-01\n2,1,A,B,1,1.0,someday\n");
        match parse(&text).unwrap_err() {
            LoadError::TimestampParse { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "someday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_negative_quantity_rejected() {
        let text = format!("{HEADER}\n1,1,A,B,-1,1.0,2023-01-01\n");
        match parse(&text).unwrap_err() {
            LoadError::InvalidField { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, "quantity");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_non_numeric_total_rejected() {
        let text = format!("{HEADER}\n1,1,A,B,1,abc,2023-01-01\n");
        assert!(matches!(
            parse(&text).unwrap_err(),
            LoadError::InvalidField {
                column: "order_total",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_float_quantity_truncated() {
        let text = format!("{HEADER}\n1,1,A,B,2.0,1.0,2023-01-01\n2,1,A,B,3.7,1.0,2023-01-01\n");
        let ds = parse(&text).unwrap();
        assert_eq!(ds.lines()[0].quantity, 2);
        assert_eq!(ds.lines()[1].quantity, 3);
    }

    #[test]
    fn test_parse_quantity_beyond_u64_rejected() {
        let text = format!(
            "{HEADER}\n1,1,A,B,1e19,1.0,2023-01-01\n2,1,A,B,1e30,1.0,2023-01-01\n"
        );
        match parse(&text).unwrap_err() {
            LoadError::InvalidField { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "quantity");
                assert_eq!(value, "1e30");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_uneven_row_is_csv_error() {
        let text = format!("{HEADER}\n1,1,A\n");
        assert!(matches!(parse(&text).unwrap_err(), LoadError::Csv(_)));
    }

    #[test]
    fn test_parse_quoted_fields() {
        let text = format!("{HEADER}\n1,1,\"Main, Large\",\"Fish & Chips\",1,12.5,2023-02-01 18:00\n");
        let ds = parse(&text).unwrap();
        assert_eq!(ds.lines()[0].category, "Main, Large");
        assert_eq!(ds.lines()[0].item, "Fish & Chips");
    }

    #[test]
    fn test_parse_derived_fields_are_stable() {
        let text = format!("{HEADER}\n1,1,A,B,1,1.0,2022-12-31 23:59:59\n");
        let a = parse(&text).unwrap();
        let b = parse(&text).unwrap();
        assert_eq!(a.lines()[0].calendar, b.lines()[0].calendar);
        assert_eq!(a.lines()[0].calendar.year, 2022);
        assert_eq!(a.lines()[0].calendar.week, 52);
    }
}
