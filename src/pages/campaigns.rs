//! Campaign Analytics page
//!
//! Campaigns arrive ranked server-side by the selected metric. The table can
//! be re-sorted locally; the sort is recomputed from the fetched order on
//! every view and never triggers a fetch.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{select_range, Loadable, PageController, PageKind, RangeSelection};
use crate::format::{
    format_date, format_percentage, format_with_commas, metric_tone, parse_timestamp, DateFormat,
    MetricKind, RangePreset, Tone,
};
use crate::insights::{CampaignSummary, InsightsApi, InsightsResult, RankingMetric, TopCampaignsQuery};

/// Campaigns requested per fetch
pub const DEFAULT_CAMPAIGN_LIMIT: u32 = 20;

const SHORT_ID_LEN: usize = 8;

/// Column the table is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Server ranking order, no local sort
    #[default]
    Ranked,
    Sent,
    ClickRate,
    OpenRate,
    Date,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Ranked => "ranked",
            SortField::Sent => "sent",
            SortField::ClickRate => "click_rate",
            SortField::OpenRate => "open_rate",
            SortField::Date => "date",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ranked" | "metric" => Ok(SortField::Ranked),
            "sent" => Ok(SortField::Sent),
            "click_rate" => Ok(SortField::ClickRate),
            "open_rate" => Ok(SortField::OpenRate),
            "date" => Ok(SortField::Date),
            other => Err(format!(
                "unknown sort field: {} (expected ranked, sent, click_rate, open_rate or date)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn flip(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CampaignSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl CampaignSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Header click: the active field flips direction, any other field
    /// becomes active in descending order.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.order = self.order.flip();
        } else {
            self.field = field;
            self.order = SortOrder::Desc;
        }
    }

    fn key_cmp(&self, a: &CampaignSummary, b: &CampaignSummary) -> Ordering {
        match self.field {
            SortField::Ranked => Ordering::Equal,
            SortField::Sent => a.emails_sent.cmp(&b.emails_sent),
            SortField::ClickRate => a.click_rate.total_cmp(&b.click_rate),
            SortField::OpenRate => a.open_rate.total_cmp(&b.open_rate),
            SortField::Date => created_millis(a).cmp(&created_millis(b)),
        }
    }

    /// Stable sort of a copy; ties keep the fetched order.
    pub fn apply<'a>(&self, campaigns: &'a [CampaignSummary]) -> Vec<&'a CampaignSummary> {
        let mut sorted: Vec<&CampaignSummary> = campaigns.iter().collect();
        if self.field == SortField::Ranked {
            return sorted;
        }
        sorted.sort_by(|a, b| match self.order {
            SortOrder::Asc => self.key_cmp(a, b),
            SortOrder::Desc => self.key_cmp(b, a),
        });
        sorted
    }
}

/// Creation time in epoch millis; missing or unparsable values sort as the epoch
fn created_millis(campaign: &CampaignSummary) -> i64 {
    campaign
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

pub struct CampaignsPage {
    range: RangeSelection,
    metric: RankingMetric,
    limit: u32,
    sort: CampaignSort,
    state: Loadable<Vec<CampaignSummary>>,
}

impl Default for CampaignsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl CampaignsPage {
    pub fn new() -> Self {
        Self {
            range: RangeSelection::Preset(PageKind::Campaigns.default_range()),
            metric: RankingMetric::default(),
            limit: DEFAULT_CAMPAIGN_LIMIT,
            sort: CampaignSort::default(),
            state: Loadable::new(),
        }
    }

    pub fn with_range(mut self, range: impl Into<RangeSelection>) -> Self {
        self.range = range.into();
        self
    }

    pub fn with_metric(mut self, metric: RankingMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sort(mut self, sort: CampaignSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn metric(&self) -> RankingMetric {
        self.metric
    }

    /// Change the ranking metric; returns `true` when the page must refetch.
    pub fn set_metric(&mut self, metric: RankingMetric) -> bool {
        if self.metric == metric {
            return false;
        }
        self.metric = metric;
        true
    }

    pub fn sort(&self) -> CampaignSort {
        self.sort
    }

    /// Local re-sort; never refetches
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    /// Card subtitle, e.g. `Ranked by open rate`
    pub fn ranking_caption(&self) -> String {
        format!("Ranked by {}", self.metric.label().to_lowercase())
    }

    /// Rows in the current sort order
    pub fn rows(&self) -> Vec<CampaignRow> {
        match self.state.data() {
            Some(campaigns) => campaign_rows(&self.sort, campaigns),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl PageController for CampaignsPage {
    type Request = TopCampaignsQuery;
    type Data = Vec<CampaignSummary>;

    const KIND: PageKind = PageKind::Campaigns;

    fn range(&self) -> &RangeSelection {
        &self.range
    }

    fn set_range(&mut self, preset: RangePreset) -> bool {
        select_range(Self::KIND, &mut self.range, preset)
    }

    fn request(&self, today: NaiveDate) -> TopCampaignsQuery {
        TopCampaignsQuery {
            range: self.range.resolve(today),
            metric: self.metric,
            limit: self.limit,
        }
    }

    async fn fetch(api: &dyn InsightsApi, query: &TopCampaignsQuery) -> InsightsResult<Vec<CampaignSummary>> {
        api.top_campaigns(query).await
    }

    fn state(&self) -> &Loadable<Vec<CampaignSummary>> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut Loadable<Vec<CampaignSummary>> {
        &mut self.state
    }
}

/// Row of the campaigns table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRow {
    pub subject: String,
    pub short_id: String,
    pub emails_sent: String,
    pub open_rate: String,
    pub click_rate: String,
    pub created: String,
    pub open_tone: Tone,
    pub click_tone: Tone,
}

pub fn campaign_rows(sort: &CampaignSort, campaigns: &[CampaignSummary]) -> Vec<CampaignRow> {
    sort.apply(campaigns)
        .into_iter()
        .map(|c| CampaignRow {
            subject: c
                .subject
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("No Subject")
                .to_string(),
            short_id: format!(
                "{}...",
                c.campaign_id.chars().take(SHORT_ID_LEN).collect::<String>()
            ),
            emails_sent: format_with_commas(c.emails_sent as f64),
            open_rate: format_percentage(c.open_rate, 1),
            click_rate: format_percentage(c.click_rate, 1),
            created: match c.created_at.as_deref() {
                Some(ts) => format_date(ts, DateFormat::Short),
                None => "N/A".to_string(),
            },
            open_tone: metric_tone(c.open_rate, MetricKind::Rate),
            click_tone: metric_tone(c.click_rate, MetricKind::Rate),
        })
        .collect()
}
