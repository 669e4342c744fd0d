//! Date formatting
//!
//! Timestamps from the insights API arrive as strings in a few shapes
//! (RFC 3339, naive ISO datetimes, bare dates). All rendering happens in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Output style for [`format_date`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `Oct 7, 2026`
    #[default]
    Short,
    /// `October 7, 2026 at 02:05 PM`
    Long,
    /// `02:05 PM`
    Time,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Short => "%b %-d, %Y",
            DateFormat::Long => "%B %-d, %Y at %I:%M %p",
            DateFormat::Time => "%I:%M %p",
        }
    }
}

const NAIVE_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse an API timestamp into UTC.
///
/// Naive timestamps and bare dates are taken as UTC.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for pattern in NAIVE_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format an API timestamp for display.
///
/// Returns `"N/A"` for missing or empty input and `"Invalid Date"` when the
/// input cannot be parsed.
pub fn format_date<'a>(input: impl Into<Option<&'a str>>, format: DateFormat) -> String {
    let input = match input.into() {
        Some(s) if !s.trim().is_empty() => s,
        _ => return "N/A".to_string(),
    };

    match parse_timestamp(input) {
        Some(dt) => dt.format(format.pattern()).to_string(),
        None => "Invalid Date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_format() {
        assert_eq!(
            format_date("2026-10-07T14:05:00Z", DateFormat::Short),
            "Oct 7, 2026"
        );
        assert_eq!(format_date("2026-03-15", DateFormat::Short), "Mar 15, 2026");
    }

    #[test]
    fn test_long_and_time_formats() {
        assert_eq!(
            format_date("2026-10-07T14:05:00.123456", DateFormat::Long),
            "October 7, 2026 at 02:05 PM"
        );
        assert_eq!(
            format_date("2026-10-07T09:30:00+02:00", DateFormat::Time),
            "07:30 AM"
        );
    }

    #[test]
    fn test_missing_and_invalid() {
        assert_eq!(format_date(None::<&str>, DateFormat::Short), "N/A");
        assert_eq!(format_date("", DateFormat::Short), "N/A");
        assert_eq!(format_date("not a date", DateFormat::Short), "Invalid Date");
        assert_eq!(format_date("2026-13-45", DateFormat::Long), "Invalid Date");
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2026-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-01-02T03:04:05"), Some(expected));
        assert_eq!(parse_timestamp("2026-01-02 03:04:05"), Some(expected));
        assert_eq!(
            parse_timestamp("2026-01-02"),
            Some(Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
