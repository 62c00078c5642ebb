/// Marker placed in the first field of a metric row.
pub const METRIC_MARKER: &str = "TPS";

/// Placeholder shown when no usable metric value exists.
pub const METRIC_PLACEHOLDER: &str = "?";

/// Default applied to a missing or non-numeric `count` field.
pub const DEFAULT_COUNT: i64 = 1;

/// Returns `true` when the row's first field is the metric marker (any case).
pub fn is_metric_row(row: &[String]) -> bool {
    row.first()
        .is_some_and(|f| f.eq_ignore_ascii_case(METRIC_MARKER))
}

/// Parses the leading integer of `raw`, or returns `default`.
///
/// Leading whitespace and a sign are accepted and parsing stops at the first
/// non-digit, so `"5.7"` yields 5 and `"12abc"` yields 12. Missing, empty and
/// digit-less fields all fall back to `default`.
pub fn parse_or_default(raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return default;
    }

    match digits[..end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => default,
    }
}

/// Parses the longest leading decimal number of `raw` (e.g. `"19.5 tps"` is 19.5).
///
/// Returns `None` when no digits are found.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // optional exponent, only taken when followed by digits
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Formats `value` with two decimals, rounding halves away from zero
/// (19.625 is `"19.63"`, where `{:.2}` alone gives `"19.62"`).
pub fn format_two_decimals(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
