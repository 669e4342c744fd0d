//! Number formatting

/// NaN is handled exactly like a missing value.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// Format a value as a fixed-point percentage.
///
/// Missing or NaN input always renders as `"0.0%"`, whatever the precision.
pub fn format_percentage(value: impl Into<Option<f64>>, decimals: usize) -> String {
    match present(value.into()) {
        Some(v) => format!("{:.*}%", decimals, v),
        None => "0.0%".to_string(),
    }
}

/// Format a value with en-US thousands grouping (`1,234,567.5`).
///
/// At most three fraction digits are kept; trailing zeros are dropped.
pub fn format_with_commas(value: impl Into<Option<f64>>) -> String {
    match present(value.into()) {
        Some(v) => group_thousands(v),
        None => "0".to_string(),
    }
}

/// Abbreviate large values with K/M/B suffixes.
///
/// Values below one thousand fall back to comma grouping.
pub fn format_number(value: impl Into<Option<f64>>) -> String {
    let Some(v) = present(value.into()) else {
        return "0".to_string();
    };

    if v >= 1_000_000_000.0 {
        format!("{:.1}B", v / 1_000_000_000.0)
    } else if v >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{:.1}K", v / 1_000.0)
    } else {
        group_thousands(v)
    }
}

fn group_thousands(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rendered = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(rendered.len() + int_part.len() / 3 + 1);
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }

    // "-0" only appears when something non-zero survived rounding
    if value < 0.0 && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.insert(0, '-');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(42.345, 1), "42.3%");
        assert_eq!(format_percentage(42.0, 2), "42.00%");
        assert_eq!(format_percentage(0.0, 0), "0%");
    }

    #[test]
    fn test_percentage_missing_values() {
        assert_eq!(format_percentage(None::<f64>, 1), "0.0%");
        assert_eq!(format_percentage(f64::NAN, 1), "0.0%");
        // precision does not apply to the fallback
        assert_eq!(format_percentage(None::<f64>, 3), "0.0%");
    }

    #[test]
    fn test_with_commas() {
        assert_eq!(format_with_commas(0.0), "0");
        assert_eq!(format_with_commas(999.0), "999");
        assert_eq!(format_with_commas(1000.0), "1,000");
        assert_eq!(format_with_commas(1234567.0), "1,234,567");
        assert_eq!(format_with_commas(1234.5), "1,234.5");
        assert_eq!(format_with_commas(0.12345), "0.123");
        assert_eq!(format_with_commas(-9876543.0), "-9,876,543");
        assert_eq!(format_with_commas(-0.0001), "0");
    }

    #[test]
    fn test_with_commas_missing_values() {
        assert_eq!(format_with_commas(None::<f64>), "0");
        assert_eq!(format_with_commas(f64::NAN), "0");
    }

    #[test]
    fn test_number_abbreviation() {
        assert_eq!(format_number(512.0), "512");
        assert_eq!(format_number(1500.0), "1.5K");
        assert_eq!(format_number(2_345_678.0), "2.3M");
        assert_eq!(format_number(7_100_000_000.0), "7.1B");
        assert_eq!(format_number(None::<f64>), "0");
        assert_eq!(format_number(f64::NAN), "0");
    }
}
