//! Insights API
//!
//! The remote analytics service is an external collaborator that returns
//! pre-aggregated JSON. This module owns the typed payloads, the error
//! type and the HTTP client.
//!
//! ## Endpoints
//!
//! | Method | Path |
//! |---|---|
//! | [`InsightsApi::overview`] | `/insights/overview` |
//! | [`InsightsApi::sender_performance`] | `/insights/performance/sender` |
//! | [`InsightsApi::funnel`] | `/insights/funnel` |
//! | [`InsightsApi::top_campaigns`] | `/insights/top-campaigns` |
//! | [`InsightsApi::summary`] | `/insights/summary` |
//! | [`InsightsApi::export`] | `/insights/export` |
//!
//! Each call is independent: no retries, no caching.

mod client;
mod error;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{InsightsClient, InsightsConfig};
pub use error::{InsightsError, InsightsResult};
pub use types::{
    CampaignSummary, DropOff, EngagementCounts, ExportFormat, ExportPayload, FunnelData,
    FunnelStage, OverviewMetrics, OverviewQuery, OverviewRates, OverviewScores, OverviewTotals,
    QuickSummary, RankingMetric, SenderMetrics, SenderPerformance, SenderRates, TopCampaignsQuery,
};

use async_trait::async_trait;

use crate::format::DateRange;

/// Read access to the insights endpoints
///
/// Implemented over HTTP by [`InsightsClient`]; page controllers only see
/// this trait.
#[async_trait]
pub trait InsightsApi: Send + Sync {
    /// Totals, rates and engagement counts
    async fn overview(&self, query: &OverviewQuery) -> InsightsResult<OverviewMetrics>;

    /// Per-sender metrics and rates
    async fn sender_performance(&self, range: &DateRange) -> InsightsResult<Vec<SenderPerformance>>;

    /// Delivered -> replied funnel
    async fn funnel(&self, range: &DateRange) -> InsightsResult<FunnelData>;

    /// Campaigns ranked server-side by a metric
    async fn top_campaigns(&self, query: &TopCampaignsQuery) -> InsightsResult<Vec<CampaignSummary>>;

    /// Quick summary over the last `days` days
    async fn summary(&self, days: u32) -> InsightsResult<QuickSummary>;

    /// Export insights as JSON or CSV
    async fn export(&self, format: ExportFormat, range: &DateRange) -> InsightsResult<ExportPayload>;
}
