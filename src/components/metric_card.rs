//! Metric Card
//!
//! Displays a single metric with its value, an optional subtitle and an
//! optional trend.

use serde::Serialize;

use crate::format::{Trend, TrendDirection, Tone};

/// Metric card view model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub subtitle: Option<String>,
    pub trend: Option<Trend>,
    pub tone: Tone,
}

impl MetricCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            subtitle: None,
            trend: None,
            tone: Tone::Default,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn trend(mut self, trend: Trend) -> Self {
        self.trend = Some(trend);
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Arrow plus absolute change, e.g. `↑ 12.5%`. Neutral trends with no
    /// baseline render nothing.
    pub fn trend_text(&self) -> Option<String> {
        let trend = self.trend?;
        if trend.direction == TrendDirection::Neutral && trend.change.is_none() {
            return None;
        }
        Some(format!("{} {:.1}%", trend.direction.arrow(), trend.percentage))
    }

    /// Single-line rendering used by the CLI
    pub fn line(&self) -> String {
        let mut line = format!("{:<20} {}", self.title, self.value);
        if let Some(trend) = self.trend_text() {
            line.push_str(&format!("  {}", trend));
        }
        if let Some(subtitle) = &self.subtitle {
            line.push_str(&format!("  ({})", subtitle));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::get_trend;

    #[test]
    fn test_card_line() {
        let card = MetricCard::new("Emails Sent", "1,200").subtitle("950 recipients");
        assert_eq!(card.line(), "Emails Sent          1,200  (950 recipients)");
    }

    #[test]
    fn test_trend_text() {
        let card = MetricCard::new("Open Rate", "42.0%").trend(get_trend(42.0, 40.0));
        assert_eq!(card.trend_text().as_deref(), Some("↑ 5.0%"));

        let flat = MetricCard::new("Open Rate", "42.0%").trend(get_trend(42.0, None::<f64>));
        assert_eq!(flat.trend_text(), None);
    }
}
