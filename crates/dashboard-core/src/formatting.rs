/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact binary midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_part = rounded - rounded.trunc();
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // "0.50" -> ".50"; a fraction that rounds to "1.00" is already
        // folded into `integer_part` by the rounding above.
        let decimal_digits = frac_str.get(1..).unwrap_or(".0");
        format!("{}{}", grouped, decimal_digits)
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a revenue amount as `"$ 1,234.56"`.
///
/// ```
/// use dashboard_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56), "$ 1,234.56");
/// assert_eq!(format_currency(0.0), "$ 0.00");
/// ```
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("$ -{}", format_number(amount.abs(), 2))
    } else {
        format!("$ {}", format_number(amount, 2))
    }
}

/// Format an item count as `"1,234 pcs"`.
pub fn format_items(count: u64) -> String {
    format!("{} pcs", format_number(count as f64, 0))
}

/// Format an optional average, rendering `None` as `"no data"`.
pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(v) => format_currency(v),
        None => "no data".to_string(),
    }
}

/// Compact SI-style rendering used for bar labels, e.g. `12.3k`, `4.56M`.
///
/// Keeps roughly `significant` significant digits.
///
/// ```
/// use dashboard_core::formatting::format_compact;
///
/// assert_eq!(format_compact(950.0, 3), "950");
/// assert_eq!(format_compact(12_345.0, 3), "12.3k");
/// assert_eq!(format_compact(4_560_000.0, 3), "4.56M");
/// ```
pub fn format_compact(value: f64, significant: u32) -> String {
    const SUFFIXES: [(f64, &str); 3] = [(1e9, "G"), (1e6, "M"), (1e3, "k")];

    let (scaled, suffix) = SUFFIXES
        .iter()
        .find(|(threshold, _)| value.abs() >= *threshold)
        .map(|(threshold, suffix)| (value / threshold, *suffix))
        .unwrap_or((value, ""));

    let int_digits = if scaled.abs() < 1.0 {
        1
    } else {
        scaled.abs().log10().floor() as u32 + 1
    };
    let decimals = significant.saturating_sub(int_digits) as usize;
    let text = format!("{:.*}", decimals, scaled);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    format!("{}{}", text, suffix)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = s.len() % 3;
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
