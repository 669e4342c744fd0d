//! Scripted in-memory insights API for controller tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::*;

/// A recorded call
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Overview(OverviewQuery),
    Senders(DateRange),
    Funnel(DateRange),
    TopCampaigns(TopCampaignsQuery),
    Summary(u32),
    Export(ExportFormat, DateRange),
}

/// Scripted outcome: a payload or an HTTP status to fail with
pub(crate) type Scripted<T> = Result<T, u16>;

/// Replays queued outcomes per endpoint and records every call.
/// An endpoint with nothing queued fails with status 404.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    calls: Mutex<Vec<Call>>,
    overview: Mutex<VecDeque<Scripted<OverviewMetrics>>>,
    senders: Mutex<VecDeque<Scripted<Vec<SenderPerformance>>>>,
    funnel: Mutex<VecDeque<Scripted<FunnelData>>>,
    campaigns: Mutex<VecDeque<Scripted<Vec<CampaignSummary>>>>,
    summary: Mutex<VecDeque<Scripted<QuickSummary>>>,
}

fn next<T>(queue: &Mutex<VecDeque<Scripted<T>>>) -> InsightsResult<T> {
    match queue.lock().unwrap().pop_front() {
        Some(Ok(value)) => Ok(value),
        Some(Err(status)) => Err(InsightsError::Status {
            status,
            message: format!("Request failed with status code {}", status),
        }),
        None => Err(InsightsError::Status {
            status: 404,
            message: "no scripted response".to_string(),
        }),
    }
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_overview(&self, outcome: Scripted<OverviewMetrics>) -> &Self {
        self.overview.lock().unwrap().push_back(outcome);
        self
    }

    pub fn push_senders(&self, outcome: Scripted<Vec<SenderPerformance>>) -> &Self {
        self.senders.lock().unwrap().push_back(outcome);
        self
    }

    pub fn push_funnel(&self, outcome: Scripted<FunnelData>) -> &Self {
        self.funnel.lock().unwrap().push_back(outcome);
        self
    }

    pub fn push_campaigns(&self, outcome: Scripted<Vec<CampaignSummary>>) -> &Self {
        self.campaigns.lock().unwrap().push_back(outcome);
        self
    }

    pub fn push_summary(&self, outcome: Scripted<QuickSummary>) -> &Self {
        self.summary.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl InsightsApi for ScriptedApi {
    async fn overview(&self, query: &OverviewQuery) -> InsightsResult<OverviewMetrics> {
        self.record(Call::Overview(query.clone()));
        next(&self.overview)
    }

    async fn sender_performance(&self, range: &DateRange) -> InsightsResult<Vec<SenderPerformance>> {
        self.record(Call::Senders(*range));
        next(&self.senders)
    }

    async fn funnel(&self, range: &DateRange) -> InsightsResult<FunnelData> {
        self.record(Call::Funnel(*range));
        next(&self.funnel)
    }

    async fn top_campaigns(&self, query: &TopCampaignsQuery) -> InsightsResult<Vec<CampaignSummary>> {
        self.record(Call::TopCampaigns(query.clone()));
        next(&self.campaigns)
    }

    async fn summary(&self, days: u32) -> InsightsResult<QuickSummary> {
        self.record(Call::Summary(days));
        next(&self.summary)
    }

    async fn export(&self, format: ExportFormat, range: &DateRange) -> InsightsResult<ExportPayload> {
        self.record(Call::Export(format, *range));
        Ok(match format {
            ExportFormat::Json => ExportPayload::Json(serde_json::json!({"rows": []})),
            ExportFormat::Csv => ExportPayload::Csv("campaign_id,open_rate\n".to_string()),
        })
    }
}

/// Campaign fixture
pub(crate) fn campaign(id: &str, sent: u64, open_rate: f64, click_rate: f64) -> CampaignSummary {
    CampaignSummary {
        campaign_id: id.to_string(),
        subject: Some(format!("Subject {}", id)),
        emails_sent: sent,
        open_rate,
        click_rate,
        metric_value: open_rate,
        created_at: None,
    }
}

/// Sender fixture
pub(crate) fn sender(email: &str, sent: u64, open_rate: f64, click_rate: f64) -> SenderPerformance {
    SenderPerformance {
        sender_email: email.to_string(),
        metrics: SenderMetrics {
            emails_sent: sent,
            unique_recipients: sent,
            campaigns: 1,
        },
        rates: SenderRates {
            open_rate,
            click_rate,
            click_to_open_rate: if open_rate > 0.0 {
                click_rate / open_rate * 100.0
            } else {
                0.0
            },
        },
    }
}
