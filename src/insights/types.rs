//! Insights API payloads and query parameters
//!
//! Payloads are request-scoped view models: each fetch replaces the previous
//! value wholesale. Missing or null fields default so a sparse response still
//! renders.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::format::{DateRange, EngagementRates};

/// `null` decodes like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================
// Overview
// ============================================

/// Totals, rates and engagement counts for a date range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewMetrics {
    #[serde(deserialize_with = "null_as_default")]
    pub totals: OverviewTotals,
    #[serde(deserialize_with = "null_as_default")]
    pub rates: OverviewRates,
    #[serde(deserialize_with = "null_as_default")]
    pub engagement: EngagementCounts,
    #[serde(deserialize_with = "null_as_default")]
    pub scores: OverviewScores,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewTotals {
    #[serde(deserialize_with = "null_as_default")]
    pub emails_sent: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub unique_recipients: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub campaigns: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub senders: u64,
}

/// Rates in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewRates {
    #[serde(deserialize_with = "null_as_default")]
    pub open_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub click_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub reply_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub click_to_open_rate: f64,
}

impl From<&OverviewRates> for EngagementRates {
    fn from(rates: &OverviewRates) -> Self {
        EngagementRates {
            open_rate: Some(rates.open_rate),
            click_rate: Some(rates.click_rate),
            reply_rate: Some(rates.reply_rate),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementCounts {
    #[serde(deserialize_with = "null_as_default")]
    pub unique_opens: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub unique_clicks: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub replies: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewScores {
    pub engagement_score: Option<f64>,
}

/// Parameters for `/insights/overview`
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewQuery {
    pub range: DateRange,
    pub campaign_ids: Vec<String>,
    pub sender_email: Option<String>,
}

impl OverviewQuery {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            campaign_ids: Vec::new(),
            sender_email: None,
        }
    }

    /// Restrict to specific campaigns
    pub fn campaigns(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.campaign_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to a single sender
    pub fn sender(mut self, email: impl Into<String>) -> Self {
        self.sender_email = Some(email.into());
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.range.query_pairs().to_vec();
        if !self.campaign_ids.is_empty() {
            pairs.push(("campaign_ids", self.campaign_ids.join(",")));
        }
        if let Some(email) = &self.sender_email {
            pairs.push(("sender_email", email.clone()));
        }
        pairs
    }
}

// ============================================
// Campaigns
// ============================================

/// One ranked campaign from `/insights/top-campaigns`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub campaign_id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emails_sent: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub open_rate: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub click_rate: f64,
    /// Value of the metric the list was ranked by
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_value: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Server-side ranking metric for top campaigns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    #[default]
    OpenRate,
    ClickRate,
    EngagementScore,
}

impl RankingMetric {
    pub const ALL: [RankingMetric; 3] = [
        RankingMetric::OpenRate,
        RankingMetric::ClickRate,
        RankingMetric::EngagementScore,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RankingMetric::OpenRate => "open_rate",
            RankingMetric::ClickRate => "click_rate",
            RankingMetric::EngagementScore => "engagement_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RankingMetric::OpenRate => "Open Rate",
            RankingMetric::ClickRate => "Click Rate",
            RankingMetric::EngagementScore => "Engagement Score",
        }
    }

    /// Next metric in selector order, wrapping around
    pub fn next(self) -> Self {
        match self {
            RankingMetric::OpenRate => RankingMetric::ClickRate,
            RankingMetric::ClickRate => RankingMetric::EngagementScore,
            RankingMetric::EngagementScore => RankingMetric::OpenRate,
        }
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open_rate" => Ok(RankingMetric::OpenRate),
            "click_rate" => Ok(RankingMetric::ClickRate),
            "engagement_score" => Ok(RankingMetric::EngagementScore),
            other => Err(format!(
                "unknown ranking metric: {} (expected open_rate, click_rate or engagement_score)",
                other
            )),
        }
    }
}

/// Parameters for `/insights/top-campaigns`
#[derive(Debug, Clone, PartialEq)]
pub struct TopCampaignsQuery {
    pub range: DateRange,
    pub metric: RankingMetric,
    pub limit: u32,
}

impl TopCampaignsQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.range.query_pairs().to_vec();
        pairs.push(("metric", self.metric.as_str().to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

// ============================================
// Senders
// ============================================

/// Per-sender performance from `/insights/performance/sender`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderPerformance {
    pub sender_email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: SenderMetrics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rates: SenderRates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderMetrics {
    #[serde(deserialize_with = "null_as_default")]
    pub emails_sent: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub unique_recipients: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub campaigns: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderRates {
    #[serde(deserialize_with = "null_as_default")]
    pub open_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub click_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub click_to_open_rate: f64,
}

// ============================================
// Funnel
// ============================================

/// Delivered -> opened -> clicked -> replied progression
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelData {
    /// Stage counts are non-increasing along the sequence
    #[serde(deserialize_with = "null_as_default")]
    pub stages: Vec<FunnelStage>,
    pub drop_off: Option<DropOff>,
    pub overall_conversion_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStage {
    pub stage: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    /// Share of the first stage, in percent
    #[serde(default, deserialize_with = "null_as_default")]
    pub percentage: f64,
    /// Conversion into the next stage; null for the last stage
    #[serde(default)]
    pub conversion_rate: Option<f64>,
}

/// Leads lost between consecutive stages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropOff {
    #[serde(deserialize_with = "null_as_default")]
    pub delivered_to_opened: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub opened_to_clicked: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub clicked_to_replied: i64,
}

impl DropOff {
    pub fn total(&self) -> i64 {
        self.delivered_to_opened + self.opened_to_clicked + self.clicked_to_replied
    }
}

// ============================================
// Summary / export
// ============================================

/// Free-form quick summary from `/insights/summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuickSummary(pub serde_json::Map<String, serde_json::Value>);

impl QuickSummary {
    /// Flattened `(key, display value)` pairs; nested objects use dotted keys.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        flatten_into(&mut out, None, &self.0);
        out
    }
}

fn flatten_into(
    out: &mut Vec<(String, String)>,
    prefix: Option<&str>,
    map: &serde_json::Map<String, serde_json::Value>,
) {
    use serde_json::Value;

    for (key, value) in map {
        let key = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) => flatten_into(out, Some(&key), inner),
            Value::Number(n) => {
                out.push((key, crate::format::format_with_commas(n.as_f64())));
            }
            Value::String(s) => out.push((key, s.clone())),
            Value::Null => out.push((key, "N/A".to_string())),
            other => out.push((key, other.to_string())),
        }
    }
}

/// Export format accepted by `/insights/export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format: {} (expected json or csv)", other)),
        }
    }
}

/// Exported insights payload
#[derive(Debug, Clone, PartialEq)]
pub enum ExportPayload {
    Json(serde_json::Value),
    Csv(String),
}

impl ExportPayload {
    /// Text written to a file or stdout
    pub fn to_text(&self) -> String {
        match self {
            ExportPayload::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            ExportPayload::Csv(text) => text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2026, 10, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_overview_sparse_payload() {
        let json = r#"{"totals": {"emails_sent": 1200}, "rates": {"open_rate": 41.5}}"#;
        let overview: OverviewMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(overview.totals.emails_sent, 1200);
        assert_eq!(overview.totals.senders, 0);
        assert_eq!(overview.rates.open_rate, 41.5);
        assert_eq!(overview.scores.engagement_score, None);
    }

    #[test]
    fn test_overview_null_fields() {
        let json = r#"{
            "totals": {"emails_sent": 800, "senders": null},
            "rates": {"open_rate": null, "click_rate": 4.5, "reply_rate": null, "click_to_open_rate": null},
            "engagement": null,
            "scores": {"engagement_score": null}
        }"#;
        let overview: OverviewMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(overview.totals.emails_sent, 800);
        assert_eq!(overview.totals.senders, 0);
        assert_eq!(overview.rates.open_rate, 0.0);
        assert_eq!(overview.rates.click_rate, 4.5);
        assert_eq!(overview.engagement, EngagementCounts::default());
        assert_eq!(overview.scores.engagement_score, None);
    }

    #[test]
    fn test_sender_and_campaign_null_rates() {
        let json = r#"[{
            "sender_email": "quiet@example.com",
            "metrics": {"emails_sent": 40, "unique_recipients": null, "campaigns": 1},
            "rates": {"open_rate": 0.0, "click_rate": null, "click_to_open_rate": null}
        }]"#;
        let senders: Vec<SenderPerformance> = serde_json::from_str(json).unwrap();
        assert_eq!(senders[0].metrics.unique_recipients, 0);
        assert_eq!(senders[0].rates.click_to_open_rate, 0.0);

        let json = r#"[{"campaign_id": "c-9", "emails_sent": null, "open_rate": null,
            "click_rate": null, "metric_value": null, "created_at": null}]"#;
        let campaigns: Vec<CampaignSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(campaigns[0].emails_sent, 0);
        assert_eq!(campaigns[0].metric_value, 0.0);
    }

    #[test]
    fn test_funnel_null_counts() {
        let json = r#"{
            "stages": [{"stage": "Delivered", "count": null, "percentage": null, "conversion_rate": null}],
            "drop_off": {"delivered_to_opened": null, "opened_to_clicked": 3, "clicked_to_replied": 1},
            "overall_conversion_rate": null
        }"#;
        let funnel: FunnelData = serde_json::from_str(json).unwrap();
        assert_eq!(funnel.stages[0].count, 0);
        assert_eq!(funnel.drop_off.unwrap().total(), 4);

        let funnel: FunnelData = serde_json::from_str(r#"{"stages": null}"#).unwrap();
        assert!(funnel.stages.is_empty());
    }

    #[test]
    fn test_funnel_last_stage_null_conversion() {
        let json = r#"{
            "stages": [
                {"stage": "Delivered", "count": 1000, "percentage": 100.0, "conversion_rate": 40.0},
                {"stage": "Opened", "count": 400, "percentage": 40.0, "conversion_rate": 25.0},
                {"stage": "Clicked", "count": 100, "percentage": 10.0, "conversion_rate": 20.0},
                {"stage": "Replied", "count": 20, "percentage": 2.0, "conversion_rate": null}
            ],
            "drop_off": {"delivered_to_opened": 600, "opened_to_clicked": 300, "clicked_to_replied": 80},
            "overall_conversion_rate": 2.0
        }"#;
        let funnel: FunnelData = serde_json::from_str(json).unwrap();
        assert_eq!(funnel.stages.len(), 4);
        assert_eq!(funnel.stages[3].conversion_rate, None);
        assert_eq!(funnel.drop_off.unwrap().total(), 980);
    }

    #[test]
    fn test_overview_query_pairs() {
        let query = OverviewQuery::new(range())
            .campaigns(["c1", "c2"])
            .sender("ana@example.com");
        let pairs = query.query_pairs();
        assert_eq!(pairs[0].1, "2026-10-10");
        assert_eq!(pairs[2], ("campaign_ids", "c1,c2".to_string()));
        assert_eq!(pairs[3], ("sender_email", "ana@example.com".to_string()));

        assert_eq!(OverviewQuery::new(range()).query_pairs().len(), 2);
    }

    #[test]
    fn test_top_campaigns_query_pairs() {
        let query = TopCampaignsQuery {
            range: range(),
            metric: RankingMetric::EngagementScore,
            limit: 20,
        };
        let pairs = query.query_pairs();
        assert!(pairs.contains(&("metric", "engagement_score".to_string())));
        assert!(pairs.contains(&("limit", "20".to_string())));
    }

    #[test]
    fn test_ranking_metric_cycle() {
        let mut metric = RankingMetric::default();
        for _ in 0..RankingMetric::ALL.len() {
            metric = metric.next();
        }
        assert_eq!(metric, RankingMetric::OpenRate);
        assert_eq!("click_rate".parse::<RankingMetric>(), Ok(RankingMetric::ClickRate));
        assert!("ctr".parse::<RankingMetric>().is_err());
    }

    #[test]
    fn test_quick_summary_entries() {
        let summary: QuickSummary = serde_json::from_str(
            r#"{"period_days": 7, "totals": {"emails_sent": 12345}, "top_sender": "ana@example.com"}"#,
        )
        .unwrap();
        let entries = summary.entries();
        assert!(entries.contains(&("period_days".to_string(), "7".to_string())));
        assert!(entries.contains(&("totals.emails_sent".to_string(), "12,345".to_string())));
        assert!(entries.contains(&("top_sender".to_string(), "ana@example.com".to_string())));
    }
}
