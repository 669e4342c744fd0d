//! Sender Performance page

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::{select_range, Loadable, PageController, PageKind, RangeSelection};
use crate::components::BarChart;
use crate::format::{
    format_percentage, format_with_commas, metric_tone, DateRange, MetricKind, RangePreset, Tone,
};
use crate::insights::{InsightsApi, InsightsResult, SenderPerformance};

pub struct SenderPage {
    range: RangeSelection,
    state: Loadable<Vec<SenderPerformance>>,
}

impl Default for SenderPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SenderPage {
    pub fn new() -> Self {
        Self {
            range: RangeSelection::Preset(PageKind::Senders.default_range()),
            state: Loadable::new(),
        }
    }

    pub fn with_range(mut self, range: impl Into<RangeSelection>) -> Self {
        self.range = range.into();
        self
    }
}

#[async_trait]
impl PageController for SenderPage {
    type Request = DateRange;
    type Data = Vec<SenderPerformance>;

    const KIND: PageKind = PageKind::Senders;

    fn range(&self) -> &RangeSelection {
        &self.range
    }

    fn set_range(&mut self, preset: RangePreset) -> bool {
        select_range(Self::KIND, &mut self.range, preset)
    }

    fn request(&self, today: NaiveDate) -> DateRange {
        self.range.resolve(today)
    }

    async fn fetch(api: &dyn InsightsApi, range: &DateRange) -> InsightsResult<Vec<SenderPerformance>> {
        api.sender_performance(range).await
    }

    fn state(&self) -> &Loadable<Vec<SenderPerformance>> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut Loadable<Vec<SenderPerformance>> {
        &mut self.state
    }
}

/// Local part of an address: `ana@example.com` -> `ana`
pub fn sender_name(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// One sender in the rate comparison chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderChartPoint {
    pub name: String,
    pub open_rate: f64,
    pub click_rate: f64,
    pub ctr: f64,
}

pub fn chart_series(senders: &[SenderPerformance]) -> Vec<SenderChartPoint> {
    senders
        .iter()
        .map(|s| SenderChartPoint {
            name: sender_name(&s.sender_email).to_string(),
            open_rate: s.rates.open_rate,
            click_rate: s.rates.click_rate,
            ctr: s.rates.click_to_open_rate,
        })
        .collect()
}

/// Grouped bars for open rate, click rate and CTR per sender
pub fn chart(senders: &[SenderPerformance]) -> BarChart {
    let points = chart_series(senders);
    BarChart::new(points.iter().map(|p| p.name.clone()).collect())
        .series("Open Rate", points.iter().map(|p| p.open_rate).collect())
        .series("Click Rate", points.iter().map(|p| p.click_rate).collect())
        .series("CTR", points.iter().map(|p| p.ctr).collect())
}

/// Totals across the fetched senders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderSummary {
    pub total_emails_sent: u64,
    /// Unweighted mean of the per-sender open rates
    pub average_open_rate: f64,
    pub average_click_rate: f64,
}

pub fn summarize(senders: &[SenderPerformance]) -> Option<SenderSummary> {
    if senders.is_empty() {
        return None;
    }
    let n = senders.len() as f64;
    Some(SenderSummary {
        total_emails_sent: senders.iter().map(|s| s.metrics.emails_sent).sum(),
        average_open_rate: senders.iter().map(|s| s.rates.open_rate).sum::<f64>() / n,
        average_click_rate: senders.iter().map(|s| s.rates.click_rate).sum::<f64>() / n,
    })
}

/// Row of the sender details table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderRow {
    pub sender: String,
    pub initial: char,
    pub emails_sent: String,
    pub recipients: String,
    pub campaigns: String,
    pub open_rate: String,
    pub click_rate: String,
    pub ctr: String,
    pub open_tone: Tone,
    pub click_tone: Tone,
}

pub fn sender_rows(senders: &[SenderPerformance]) -> Vec<SenderRow> {
    senders
        .iter()
        .map(|s| SenderRow {
            sender: s.sender_email.clone(),
            initial: s
                .sender_email
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or('?'),
            emails_sent: format_with_commas(s.metrics.emails_sent as f64),
            recipients: format_with_commas(s.metrics.unique_recipients as f64),
            campaigns: format_with_commas(s.metrics.campaigns as f64),
            open_rate: format_percentage(s.rates.open_rate, 1),
            click_rate: format_percentage(s.rates.click_rate, 1),
            ctr: format_percentage(s.rates.click_to_open_rate, 1),
            open_tone: metric_tone(s.rates.open_rate, MetricKind::Rate),
            click_tone: metric_tone(s.rates.click_rate, MetricKind::Rate),
        })
        .collect()
}
