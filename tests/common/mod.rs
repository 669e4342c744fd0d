//! In-process insights server for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;

/// One request seen by the fixture
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub path: String,
    pub params: HashMap<String, String>,
}

#[derive(Default)]
struct FixtureState {
    requests: Vec<Recorded>,
    failure: Option<(StatusCode, String)>,
    nulls: bool,
}

type Shared = Arc<Mutex<FixtureState>>;

pub struct FixtureServer {
    pub base_url: String,
    state: Shared,
}

impl FixtureServer {
    /// Serve the canned insights endpoints under `/api` on an ephemeral port
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Answer every following request with `status` and `body`
    pub fn fail_with(&self, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).unwrap();
        self.state.lock().unwrap().failure = Some((status, body.to_string()));
    }

    /// Answer overview and sender requests with null rates and counts
    pub fn serve_nulls(&self) {
        self.state.lock().unwrap().nulls = true;
    }

    pub fn recover(&self) {
        self.state.lock().unwrap().failure = None;
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests to one endpoint, e.g. `/insights/overview`
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn handle(
    State(state): State<Shared>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path().trim_start_matches("/api").to_string();

    let (failure, nulls) = {
        let mut state = state.lock().unwrap();
        state.requests.push(Recorded {
            path: path.clone(),
            params: params.clone(),
        });
        (state.failure.clone(), state.nulls)
    };
    if let Some((status, body)) = failure {
        return (status, body).into_response();
    }

    match path.as_str() {
        "/insights/overview" if nulls => Json(null_overview()).into_response(),
        "/insights/overview" => Json(overview()).into_response(),
        "/insights/top-campaigns" => {
            let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(5);
            let campaigns: Vec<_> = top_campaigns().into_iter().take(limit).collect();
            Json(campaigns).into_response()
        }
        "/insights/performance/sender" if nulls => Json(null_senders()).into_response(),
        "/insights/performance/sender" => Json(senders()).into_response(),
        "/insights/funnel" => Json(funnel()).into_response(),
        "/insights/summary" => Json(json!({
            "period_days": params.get("days").and_then(|d| d.parse::<u32>().ok()),
            "emails_sent": 4210,
            "top_sender": "ana@example.com"
        }))
        .into_response(),
        "/insights/export" => match params.get("format").map(String::as_str) {
            Some("csv") => (
                [(header::CONTENT_TYPE, "text/csv")],
                "campaign_id,emails_sent\nc-1001,1200\nc-1002,800\n",
            )
                .into_response(),
            _ => Json(json!({ "campaigns": top_campaigns() })).into_response(),
        },
        _ => (StatusCode::NOT_FOUND, r#"{"detail": "Not Found"}"#).into_response(),
    }
}

pub fn overview() -> serde_json::Value {
    json!({
        "totals": {"emails_sent": 12500, "unique_recipients": 9800, "campaigns": 14, "senders": 3},
        "rates": {"open_rate": 42.36, "click_rate": 8.1, "reply_rate": 1.9, "click_to_open_rate": 19.12},
        "engagement": {"unique_opens": 5295, "unique_clicks": 1012, "replies": 237},
        "scores": {"engagement_score": 61.4}
    })
}

pub fn top_campaigns() -> Vec<serde_json::Value> {
    vec![
        json!({
            "campaign_id": "c-1001-autumn",
            "subject": "Autumn launch",
            "emails_sent": 1200,
            "open_rate": 51.2,
            "click_rate": 12.4,
            "metric_value": 51.2,
            "created_at": "2026-10-02T09:30:00Z"
        }),
        json!({
            "campaign_id": "c-1002-digest",
            "subject": null,
            "emails_sent": 800,
            "open_rate": 33.0,
            "click_rate": 4.5,
            "metric_value": 33.0,
            "created_at": null
        }),
    ]
}

pub fn senders() -> serde_json::Value {
    json!([
        {
            "sender_email": "ana@example.com",
            "metrics": {"emails_sent": 7000, "unique_recipients": 5400, "campaigns": 8},
            "rates": {"open_rate": 45.0, "click_rate": 9.0, "click_to_open_rate": 20.0}
        },
        {
            "sender_email": "ops@example.com",
            "metrics": {"emails_sent": 5500, "unique_recipients": 4400, "campaigns": 6},
            "rates": {"open_rate": 39.0, "click_rate": 7.0, "click_to_open_rate": 17.9}
        }
    ])
}

pub fn funnel() -> serde_json::Value {
    json!({
        "stages": [
            {"stage": "Delivered", "count": 1000, "percentage": 100.0, "conversion_rate": 15.0},
            {"stage": "Opened", "count": 150, "percentage": 15.0, "conversion_rate": 10.0},
            {"stage": "Clicked", "count": 15, "percentage": 1.5, "conversion_rate": 20.0},
            {"stage": "Replied", "count": 3, "percentage": 0.3, "conversion_rate": null}
        ],
        "drop_off": {"delivered_to_opened": 850, "opened_to_clicked": 135, "clicked_to_replied": 12},
        "overall_conversion_rate": 0.3
    })
}

/// Overview of a range where nothing was opened yet
pub fn null_overview() -> serde_json::Value {
    json!({
        "totals": {"emails_sent": 300, "unique_recipients": 280, "campaigns": 1, "senders": null},
        "rates": {"open_rate": null, "click_rate": null, "reply_rate": null, "click_to_open_rate": null},
        "engagement": {"unique_opens": null, "unique_clicks": null, "replies": null},
        "scores": {"engagement_score": null}
    })
}

pub fn null_senders() -> serde_json::Value {
    json!([
        {
            "sender_email": "quiet@example.com",
            "metrics": {"emails_sent": 300, "unique_recipients": null, "campaigns": 1},
            "rates": {"open_rate": 0.0, "click_rate": null, "click_to_open_rate": null}
        }
    ])
}
