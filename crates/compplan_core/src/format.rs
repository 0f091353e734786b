//! Display formatting shared by every calculator
//!
//! Results carry pre-built strings (timeline values, summary rows) so the
//! consumer does not have to know which figures are currency and which are
//! counts. Currency is always rendered in whole units.

/// Insert thousands separators into an unsigned integer
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a currency value rounded to whole units (e.g. `$12,345`)
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    let units = value.abs().round() as u64;
    if value < 0.0 && units > 0 {
        format!("-${}", group_thousands(units))
    } else {
        format!("${}", group_thousands(units))
    }
}

/// Format a count with thousands separators (e.g. `3,280`)
pub fn format_count(value: u64) -> String {
    group_thousands(value)
}

/// Format a whole percentage already on the 0-100 scale (e.g. `18%`)
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    format!("{}%", value.round() as i64)
}

/// Format a fraction (0-1) as a percentage with one decimal place (e.g. `7.0%`)
///
/// Rounds on the thousandths so that `0.07` renders as `7.0%` rather than
/// exposing float noise.
pub fn format_percent_one_decimal(fraction: f64) -> String {
    format!("{:.1}%", one_decimal_percent(fraction))
}

/// Convert a fraction to a percentage rounded to one decimal place
pub fn one_decimal_percent(fraction: f64) -> f64 {
    if !fraction.is_finite() {
        return 0.0;
    }
    (fraction * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(990.0), "$990");
        assert_eq!(format_currency(10_560.000_000_000_002), "$10,560");
        assert_eq!(format_currency(132_000.0), "$132,000");
        assert_eq!(format_currency(1_234_567.49), "$1,234,567");
        assert_eq!(format_currency(-2_500.5), "-$2,501");
        assert_eq!(format_currency(-0.2), "$0");
        assert_eq!(format_currency(f64::NAN), "$0");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(3_280), "3,280");
        assert_eq!(format_count(1_000_000), "1,000,000");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(18.0), "18%");
        assert_eq!(format_percent(18.5), "19%");
        assert_eq!(format_percent(100.0), "100%");
        assert_eq!(format_percent(f64::INFINITY), "0%");
    }

    #[test]
    fn test_format_percent_one_decimal() {
        assert_eq!(format_percent_one_decimal(0.07), "7.0%");
        assert_eq!(format_percent_one_decimal(0.1), "10.0%");
        assert_eq!(format_percent_one_decimal(0.055), "5.5%");
        assert!((one_decimal_percent(0.045) - 4.5).abs() < 1e-12);
    }
}
