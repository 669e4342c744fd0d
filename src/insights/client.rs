//! Insights REST API Client
//!
//! HTTP client for the analytics endpoints under `/insights`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

use super::error::{status_message, InsightsError, InsightsResult};
use super::types::*;
use super::InsightsApi;
use crate::format::DateRange;

/// Insights REST API client
pub struct InsightsClient {
    client: Client,
    config: InsightsConfig,
}

/// Configuration for the insights client
#[derive(Debug, Clone)]
pub struct InsightsConfig {
    /// Base URL the `/insights/...` paths are appended to
    /// (e.g., "http://localhost:8000/api")
    pub base_url: String,
    /// Optional request timeout; requests wait indefinitely when unset
    pub request_timeout: Option<Duration>,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            request_timeout: None,
        }
    }
}

impl InsightsClient {
    /// Create a new client with the given configuration
    pub fn new(config: InsightsConfig) -> InsightsResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config: InsightsConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Issue a GET and return the response when it is 2xx
    async fn send(&self, path: &str, params: &[(&'static str, String)]) -> InsightsResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(request_id = %request_id, endpoint = path, ?params, "Requesting insights");

        let response = self
            .client
            .get(self.url(path))
            .query(params)
            .header("x-request-id", &request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(request_id = %request_id, endpoint = path, error = %e, "Insights request failed");
                InsightsError::Network(e)
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = status_message(status.as_u16(), &body);
        tracing::warn!(
            request_id = %request_id,
            endpoint = path,
            status = status.as_u16(),
            message = %message,
            "Insights API returned an error"
        );

        Err(InsightsError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> InsightsResult<T> {
        let response = self.send(path, params).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| InsightsError::Decode(e.to_string()))
    }
}

#[async_trait]
impl InsightsApi for InsightsClient {
    async fn overview(&self, query: &OverviewQuery) -> InsightsResult<OverviewMetrics> {
        self.get_json("/insights/overview", &query.query_pairs()).await
    }

    async fn sender_performance(&self, range: &DateRange) -> InsightsResult<Vec<SenderPerformance>> {
        self.get_json("/insights/performance/sender", &range.query_pairs())
            .await
    }

    async fn funnel(&self, range: &DateRange) -> InsightsResult<FunnelData> {
        self.get_json("/insights/funnel", &range.query_pairs()).await
    }

    async fn top_campaigns(&self, query: &TopCampaignsQuery) -> InsightsResult<Vec<CampaignSummary>> {
        self.get_json("/insights/top-campaigns", &query.query_pairs())
            .await
    }

    async fn summary(&self, days: u32) -> InsightsResult<QuickSummary> {
        self.get_json("/insights/summary", &[("days", days.to_string())])
            .await
    }

    async fn export(&self, format: ExportFormat, range: &DateRange) -> InsightsResult<ExportPayload> {
        let mut params = vec![("format", format.as_str().to_string())];
        params.extend(range.query_pairs());

        match format {
            ExportFormat::Json => self
                .get_json("/insights/export", &params)
                .await
                .map(ExportPayload::Json),
            ExportFormat::Csv => {
                let response = self.send("/insights/export", &params).await?;
                let text = response
                    .text()
                    .await
                    .map_err(|e| InsightsError::Decode(e.to_string()))?;
                Ok(ExportPayload::Csv(text))
            }
        }
    }
}
