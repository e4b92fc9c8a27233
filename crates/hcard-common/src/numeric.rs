//! Numeric parsing and formatting utilities.

/// Largest magnitude at which every integer-valued `f64` still converts to `i64` exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A number parsed from text, split by whether it carries a fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedNumber {
    Int(i64),
    Float(f64),
}

impl ParsedNumber {
    /// Returns the value as `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            ParsedNumber::Int(v) => v as f64,
            ParsedNumber::Float(v) => v,
        }
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Returns true when `value` has a non-zero fractional part.
pub fn has_fraction(value: f64) -> bool {
    value.fract() != 0.0
}

/// Parses numeric-looking text into an integer or a float.
///
/// Integer-valued input (including `"150.0"` and `"1.5e3"`) becomes
/// [`ParsedNumber::Int`]; anything with a fractional part stays a float.
/// Non-finite values (`inf`, `NaN`) are rejected.
///
/// # Examples
///
/// ```
/// use hcard_common::numeric::{parse_number, ParsedNumber};
///
/// assert_eq!(parse_number("150"), Some(ParsedNumber::Int(150)));
/// assert_eq!(parse_number(" 36.6 "), Some(ParsedNumber::Float(36.6)));
/// assert_eq!(parse_number("tall"), None);
/// ```
pub fn parse_number(value: &str) -> Option<ParsedNumber> {
    if let Some(v) = parse_i64(value) {
        return Some(ParsedNumber::Int(v));
    }
    let v = parse_f64(value)?;
    if !v.is_finite() {
        return None;
    }
    if has_fraction(v) || v.abs() > MAX_EXACT_INTEGER {
        Some(ParsedNumber::Float(v))
    } else {
        Some(ParsedNumber::Int(v as i64))
    }
}

/// Formats a floating-point number as a string without trailing zeros after decimal.
///
/// Only trims trailing zeros if the number contains a decimal point.
/// Integer-valued floats like 40.0 are formatted as "40", not "4".
///
/// # Examples
///
/// ```
/// use hcard_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// assert_eq!(format_numeric(40.0), "40");
/// assert_eq!(format_numeric(100.0), "100");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() || trimmed == "-" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("3.14"), Some(3.14));
        assert_eq!(parse_f64("  3.14  "), Some(3.14));
        assert_eq!(parse_f64("invalid"), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_i64("42"), Some(42));
        assert_eq!(parse_i64("  -100  "), Some(-100));
        assert_eq!(parse_i64("4.2"), None);
    }

    #[test]
    fn test_parse_number_splits_on_fraction() {
        assert_eq!(parse_number("150"), Some(ParsedNumber::Int(150)));
        assert_eq!(parse_number("150.0"), Some(ParsedNumber::Int(150)));
        assert_eq!(parse_number("1.5e3"), Some(ParsedNumber::Int(1500)));
        assert_eq!(parse_number("98.6"), Some(ParsedNumber::Float(98.6)));
        assert_eq!(parse_number("-0.5"), Some(ParsedNumber::Float(-0.5)));
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(1.5), "1.5");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(40.0), "40");
        assert_eq!(format_numeric(-2.50), "-2.5");
        assert_eq!(format_numeric(9876543210.0), "9876543210");
    }
}
