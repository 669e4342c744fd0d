//! Dashboard Overview page
//!
//! Fetches the overview metrics and the top campaigns concurrently and waits
//! for both before leaving `loading`.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::{select_range, Loadable, PageController, PageKind, RangeSelection};
use crate::components::MetricCard;
use crate::format::{
    calculate_engagement_score, format_percentage, format_with_commas, metric_tone, EngagementRates,
    MetricKind, RangePreset, Tone,
};
use crate::insights::{
    CampaignSummary, InsightsApi, InsightsResult, OverviewMetrics, OverviewQuery, RankingMetric,
    TopCampaignsQuery,
};

/// Campaigns shown in the dashboard's top list
pub const DEFAULT_CAMPAIGN_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub overview: OverviewQuery,
    pub top_campaigns: TopCampaignsQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub overview: OverviewMetrics,
    pub top_campaigns: Vec<CampaignSummary>,
}

pub struct DashboardPage {
    range: RangeSelection,
    campaign_limit: u32,
    state: Loadable<DashboardData>,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardPage {
    pub fn new() -> Self {
        Self {
            range: RangeSelection::Preset(PageKind::Dashboard.default_range()),
            campaign_limit: DEFAULT_CAMPAIGN_LIMIT,
            state: Loadable::new(),
        }
    }

    pub fn with_range(mut self, range: impl Into<RangeSelection>) -> Self {
        self.range = range.into();
        self
    }

    pub fn with_campaign_limit(mut self, limit: u32) -> Self {
        self.campaign_limit = limit;
        self
    }

    /// View model of the latest payload
    pub fn view_model(&self) -> Option<DashboardView> {
        self.state.data().map(DashboardView::from_data)
    }
}

#[async_trait]
impl PageController for DashboardPage {
    type Request = DashboardRequest;
    type Data = DashboardData;

    const KIND: PageKind = PageKind::Dashboard;

    fn range(&self) -> &RangeSelection {
        &self.range
    }

    fn set_range(&mut self, preset: RangePreset) -> bool {
        select_range(Self::KIND, &mut self.range, preset)
    }

    fn request(&self, today: NaiveDate) -> DashboardRequest {
        let range = self.range.resolve(today);
        DashboardRequest {
            overview: OverviewQuery::new(range),
            top_campaigns: TopCampaignsQuery {
                range,
                metric: RankingMetric::OpenRate,
                limit: self.campaign_limit,
            },
        }
    }

    async fn fetch(api: &dyn InsightsApi, request: &DashboardRequest) -> InsightsResult<DashboardData> {
        let (overview, top_campaigns) = tokio::try_join!(
            api.overview(&request.overview),
            api.top_campaigns(&request.top_campaigns),
        )?;
        Ok(DashboardData {
            overview,
            top_campaigns,
        })
    }

    fn state(&self) -> &Loadable<DashboardData> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut Loadable<DashboardData> {
        &mut self.state
    }
}

/// Row of the top campaigns table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCampaignRow {
    pub subject: String,
    pub emails_sent: String,
    pub open_rate: String,
    pub click_rate: String,
    pub open_tone: Tone,
    pub click_tone: Tone,
}

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub cards: Vec<MetricCard>,
    pub stats: Vec<MetricCard>,
    pub campaigns: Vec<TopCampaignRow>,
}

impl DashboardView {
    pub fn from_data(data: &DashboardData) -> Self {
        let overview = &data.overview;
        let totals = &overview.totals;
        let rates = &overview.rates;
        let engagement = &overview.engagement;

        let cards = vec![
            MetricCard::new("Emails Sent", format_with_commas(totals.emails_sent as f64))
                .subtitle(format!(
                    "{} recipients",
                    format_with_commas(totals.unique_recipients as f64)
                ))
                .tone(Tone::Info),
            MetricCard::new("Open Rate", format_percentage(rates.open_rate, 1))
                .subtitle(format!(
                    "{} unique opens",
                    format_with_commas(engagement.unique_opens as f64)
                ))
                .tone(Tone::Success),
            MetricCard::new("Click Rate", format_percentage(rates.click_rate, 1))
                .subtitle(format!(
                    "{} unique clicks",
                    format_with_commas(engagement.unique_clicks as f64)
                ))
                .tone(Tone::Info),
            MetricCard::new("Reply Rate", format_percentage(rates.reply_rate, 1))
                .subtitle(format!(
                    "{} replies",
                    format_with_commas(engagement.replies as f64)
                ))
                .tone(Tone::Warning),
        ];

        let score = overview
            .scores
            .engagement_score
            .unwrap_or_else(|| calculate_engagement_score(&EngagementRates::from(rates)) as f64);

        let stats = vec![
            MetricCard::new("Active Campaigns", format_with_commas(totals.campaigns as f64)),
            MetricCard::new("Senders", format_with_commas(totals.senders as f64)),
            MetricCard::new(
                "Click-to-Open Rate",
                format_percentage(rates.click_to_open_rate, 1),
            ),
            MetricCard::new("Engagement Score", format!("{:.1}", score)),
        ];

        let campaigns = data
            .top_campaigns
            .iter()
            .map(|c| TopCampaignRow {
                subject: c
                    .subject
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("No Subject")
                    .to_string(),
                emails_sent: format_with_commas(c.emails_sent as f64),
                open_rate: format_percentage(c.open_rate, 1),
                click_rate: format_percentage(c.click_rate, 1),
                open_tone: metric_tone(c.open_rate, MetricKind::Rate),
                click_tone: metric_tone(c.click_rate, MetricKind::Rate),
            })
            .collect();

        Self {
            cards,
            stats,
            campaigns,
        }
    }
}
