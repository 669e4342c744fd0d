//! Display Formatting
//!
//! Pure helpers that turn raw metric values into display strings and
//! derived scores. Every formatter accepts missing or NaN input and falls
//! back to a documented zero representation instead of failing.
//!
//! - [`numbers`]: percentages, comma grouping, K/M/B abbreviation
//! - [`dates`]: timestamp parsing and short/long/time rendering
//! - [`range`]: named date-range presets and validated ranges
//! - [`score`]: trends, engagement score, metric tones

pub mod dates;
pub mod numbers;
pub mod range;
pub mod score;

pub use dates::{format_date, parse_timestamp, DateFormat};
pub use numbers::{format_number, format_percentage, format_with_commas};
pub use range::{date_range_preset, today, DateRange, InvalidDateRange, RangePreset};
pub use score::{
    calculate_engagement_score, get_trend, metric_tone, EngagementRates, MetricKind, Tone, Trend,
    TrendDirection,
};
