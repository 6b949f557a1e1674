//! Lenient numeric input parsing for form fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("number pattern is valid");
}

/// Parse the leading numeric prefix of `input` ("12.5kg" -> 12.5).
/// Anything without a numeric prefix, or a non-finite result, yields 0.
pub fn parse_number(input: &str) -> f64 {
    LEADING_NUMBER
        .find(input.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Clamp to `[0, ∞)`, mapping NaN and negative zero to 0.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_plain() {
        assert_eq!(parse_number("42"), 42.0);
        assert_eq!(parse_number("  3.25 "), 3.25);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("-5"), -5.0);
        assert_eq!(parse_number("1e3"), 1000.0);
    }

    #[test]
    fn test_parse_number_prefix_and_garbage() {
        assert_eq!(parse_number("12abc"), 12.0);
        assert_eq!(parse_number("7."), 7.0);
        assert_eq!(parse_number("1e"), 1.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("Infinity"), 0.0);
        assert_eq!(parse_number("1e999"), 0.0);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(-5.0), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(2.5), 2.5);
        assert!(non_negative(-0.0).is_sign_positive());
    }
}
