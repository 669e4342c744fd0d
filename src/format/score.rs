//! Trends, scores and tones

use serde::Serialize;

/// Direction of change between two readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            TrendDirection::Up => "↑",
            TrendDirection::Down => "↓",
            TrendDirection::Neutral => "→",
        }
    }
}

/// Relative change of a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Absolute percentage change
    pub percentage: f64,
    /// Signed percentage change, absent when there was no baseline
    pub change: Option<f64>,
}

impl Trend {
    pub fn neutral() -> Self {
        Self {
            direction: TrendDirection::Neutral,
            percentage: 0.0,
            change: None,
        }
    }
}

/// Compare a reading against its previous value.
///
/// A missing, zero or NaN baseline yields a neutral trend instead of a
/// division by zero.
pub fn get_trend(current: f64, previous: impl Into<Option<f64>>) -> Trend {
    let previous = match previous.into() {
        Some(p) if p != 0.0 && !p.is_nan() => p,
        _ => return Trend::neutral(),
    };

    let change = (current - previous) / previous * 100.0;
    let direction = if change > 0.0 {
        TrendDirection::Up
    } else if change < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    };

    Trend {
        direction,
        percentage: change.abs(),
        change: Some(change),
    }
}

/// Rates feeding the engagement score, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngagementRates {
    pub open_rate: Option<f64>,
    pub click_rate: Option<f64>,
    pub reply_rate: Option<f64>,
}

const OPEN_WEIGHT: f64 = 0.4;
const CLICK_WEIGHT: f64 = 0.35;
const REPLY_WEIGHT: f64 = 0.25;

/// Weighted engagement score: opens 40%, clicks 35%, replies 25%.
///
/// Rounded half-up and capped at 100. Negative rates are not guarded.
pub fn calculate_engagement_score(rates: &EngagementRates) -> i64 {
    let rate = |r: Option<f64>| r.filter(|v| !v.is_nan()).unwrap_or(0.0);

    let score = rate(rates.open_rate) * OPEN_WEIGHT
        + rate(rates.click_rate) * CLICK_WEIGHT
        + rate(rates.reply_rate) * REPLY_WEIGHT;

    (score + 0.5).floor().min(100.0) as i64
}

/// How a value should be read when picking a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Completion-style percentages (75/50 thresholds)
    Percentage,
    /// Email engagement rates (30/15 thresholds)
    Rate,
    Plain,
}

/// Visual emphasis for a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
    #[default]
    Default,
}

pub fn metric_tone(value: f64, kind: MetricKind) -> Tone {
    match kind {
        MetricKind::Percentage if value >= 75.0 => Tone::Success,
        MetricKind::Percentage if value >= 50.0 => Tone::Warning,
        MetricKind::Percentage => Tone::Danger,
        MetricKind::Rate if value >= 30.0 => Tone::Success,
        MetricKind::Rate if value >= 15.0 => Tone::Warning,
        MetricKind::Rate => Tone::Danger,
        MetricKind::Plain => Tone::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_without_baseline() {
        for current in [0.0, 12.5, -3.0] {
            assert_eq!(get_trend(current, 0.0), Trend::neutral());
            assert_eq!(get_trend(current, None::<f64>), Trend::neutral());
            assert_eq!(get_trend(current, f64::NAN), Trend::neutral());
        }
    }

    #[test]
    fn test_trend_direction() {
        let up = get_trend(150.0, 100.0);
        assert_eq!(up.direction, TrendDirection::Up);
        assert_eq!(up.percentage, 50.0);
        assert_eq!(up.change, Some(50.0));

        let down = get_trend(75.0, 100.0);
        assert_eq!(down.direction, TrendDirection::Down);
        assert_eq!(down.percentage, 25.0);
        assert_eq!(down.change, Some(-25.0));

        let flat = get_trend(40.0, 40.0);
        assert_eq!(flat.direction, TrendDirection::Neutral);
        assert_eq!(flat.change, Some(0.0));
    }

    #[test]
    fn test_engagement_score_clamps_at_100() {
        let rates = EngagementRates {
            open_rate: Some(100.0),
            click_rate: Some(100.0),
            reply_rate: Some(100.0),
        };
        assert_eq!(calculate_engagement_score(&rates), 100);

        let rates = EngagementRates {
            open_rate: Some(500.0),
            ..Default::default()
        };
        assert_eq!(calculate_engagement_score(&rates), 100);
    }

    #[test]
    fn test_engagement_score_empty_and_weighted() {
        assert_eq!(calculate_engagement_score(&EngagementRates::default()), 0);

        // 40*0.4 + 10*0.35 + 2*0.25 = 16 + 3.5 + 0.5 = 20
        let rates = EngagementRates {
            open_rate: Some(40.0),
            click_rate: Some(10.0),
            reply_rate: Some(2.0),
        };
        assert_eq!(calculate_engagement_score(&rates), 20);

        // 0.4 * 6.25 = 2.5 rounds up
        let rates = EngagementRates {
            open_rate: Some(6.25),
            ..Default::default()
        };
        assert_eq!(calculate_engagement_score(&rates), 3);
    }

    #[test]
    fn test_engagement_score_no_lower_clamp() {
        let rates = EngagementRates {
            open_rate: Some(-50.0),
            ..Default::default()
        };
        assert_eq!(calculate_engagement_score(&rates), -20);
    }

    #[test]
    fn test_metric_tone() {
        assert_eq!(metric_tone(80.0, MetricKind::Percentage), Tone::Success);
        assert_eq!(metric_tone(50.0, MetricKind::Percentage), Tone::Warning);
        assert_eq!(metric_tone(49.9, MetricKind::Percentage), Tone::Danger);
        assert_eq!(metric_tone(30.0, MetricKind::Rate), Tone::Success);
        assert_eq!(metric_tone(15.0, MetricKind::Rate), Tone::Warning);
        assert_eq!(metric_tone(3.0, MetricKind::Rate), Tone::Danger);
        assert_eq!(metric_tone(3.0, MetricKind::Plain), Tone::Default);
    }
}
