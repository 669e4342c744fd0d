//! Insights client errors
//!
//! Every failure collapses into "the fetch failed" with a human-readable
//! message; pages only ever show the [`Display`](std::fmt::Display) text.

use thiserror::Error;

/// Errors returned by the insights API client
#[derive(Error, Debug)]
pub enum InsightsError {
    /// Transport failure (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body could not be decoded
    #[error("Invalid response from insights API: {0}")]
    Decode(String),
}

impl InsightsError {
    /// HTTP status for non-2xx failures
    pub fn status(&self) -> Option<u16> {
        match self {
            InsightsError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for insights operations
pub type InsightsResult<T> = Result<T, InsightsError>;

/// Pick the message to surface for a failed response.
///
/// Uses the body's `detail`, `error` or `message` string when present.
pub(crate) fn status_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "error", "message"]
                .iter()
                .find_map(|key| value.get(key).and_then(|m| m.as_str()).map(str::to_string))
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {}", status))
}
