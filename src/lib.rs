//! # Mailscope
//!
//! Email campaign insights: a terminal dashboard and CLI over a remote
//! analytics API that serves pre-aggregated campaign metrics.
//!
//! ## Modules
//!
//! - [`format`]: number, percentage, date and range formatting; trends and scores
//! - [`insights`]: typed client for the `/insights` endpoints
//! - [`pages`]: per-page fetch state and view models
//! - [`components`]: charts, cards and tables shared by all renderers
//! - [`render`]: text/JSON/CSV output of one-shot commands
//! - [`tui`]: interactive ratatui dashboard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mailscope::format::today;
//! use mailscope::insights::{InsightsClient, InsightsConfig};
//! use mailscope::pages::{FunnelPage, PageController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = InsightsClient::new(InsightsConfig::default())?;
//!
//!     let mut funnel = FunnelPage::new();
//!     funnel.refresh(&client, today()).await;
//!
//!     if let Some(data) = funnel.state().data() {
//!         println!("{} stages", data.stages.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod components;
pub mod config;
pub mod format;
pub mod insights;
pub mod logging;
pub mod pages;
pub mod render;
pub mod tui;

pub use config::Config;
pub use insights::{InsightsApi, InsightsClient, InsightsConfig, InsightsError};
