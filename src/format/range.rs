//! Date ranges
//!
//! Every page queries the insights API for a `[start_date, end_date]` window.
//! Windows are usually derived from a named preset anchored at "today".

use chrono::{Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named date-range presets offered by the pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePreset {
    Today,
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl RangePreset {
    pub const ALL: [RangePreset; 5] = [
        RangePreset::Today,
        RangePreset::Week,
        RangePreset::Month,
        RangePreset::Quarter,
        RangePreset::Year,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RangePreset::Today => "today",
            RangePreset::Week => "week",
            RangePreset::Month => "month",
            RangePreset::Quarter => "quarter",
            RangePreset::Year => "year",
        }
    }

    /// Label shown in range selectors
    pub fn label(self) -> &'static str {
        match self {
            RangePreset::Today => "Today",
            RangePreset::Week => "Last 7 Days",
            RangePreset::Month => "Last 30 Days",
            RangePreset::Quarter => "Last 90 Days",
            RangePreset::Year => "Last Year",
        }
    }

    /// Parse a preset name, falling back to the 7-day window for unknown names.
    pub fn lenient(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(RangePreset::Today),
            "week" => Ok(RangePreset::Week),
            "month" => Ok(RangePreset::Month),
            "quarter" => Ok(RangePreset::Quarter),
            "year" => Ok(RangePreset::Year),
            other => Err(format!("unknown range preset: {}", other)),
        }
    }
}

/// Inclusive calendar window sent as `start_date`/`end_date` (`YYYY-MM-DD`).
///
/// `start_date <= end_date` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// Rejected custom range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid date range: {start} is after {end}")]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a custom range.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, InvalidDateRange> {
        if start_date > end_date {
            return Err(InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Window for a preset ending on `today`.
    ///
    /// Month arithmetic clamps to the end of shorter months
    /// (March 31 minus one month is February 28/29).
    pub fn from_preset(preset: RangePreset, today: NaiveDate) -> Self {
        let start = match preset {
            RangePreset::Today => Some(today),
            RangePreset::Week => today.checked_sub_days(Days::new(7)),
            RangePreset::Month => today.checked_sub_months(Months::new(1)),
            RangePreset::Quarter => today.checked_sub_months(Months::new(3)),
            RangePreset::Year => today.checked_sub_months(Months::new(12)),
        };

        Self {
            start_date: start.unwrap_or(today),
            end_date: today,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Inclusive length in days
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// `start_date`/`end_date` query parameters
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
        ]
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}

/// Current calendar date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolve a preset name against the current date.
///
/// Unknown names behave like `"week"`.
pub fn date_range_preset(name: &str) -> DateRange {
    DateRange::from_preset(RangePreset::lenient(name), today())
}
