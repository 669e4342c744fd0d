//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::format::RangePreset;
use crate::insights::{InsightsConfig, RankingMetric};
use crate::pages::{PageKind, RangeSelection};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub pages: PagesConfig,

    #[serde(default)]
    pub tui: TuiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Insights API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Requests wait indefinitely when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn insights_config(&self) -> InsightsConfig {
        InsightsConfig {
            base_url: self.base_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Page defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagesConfig {
    #[serde(default = "default_week")]
    pub dashboard_range: RangePreset,

    #[serde(default = "default_week")]
    pub senders_range: RangePreset,

    #[serde(default = "default_month")]
    pub campaigns_range: RangePreset,

    #[serde(default = "default_month")]
    pub funnel_range: RangePreset,

    #[serde(default = "default_dashboard_limit")]
    pub dashboard_campaign_limit: u32,

    #[serde(default = "default_campaign_limit")]
    pub campaign_limit: u32,

    #[serde(default)]
    pub campaign_metric: RankingMetric,

    #[serde(default = "default_summary_days")]
    pub summary_days: u32,
}

fn default_week() -> RangePreset {
    RangePreset::Week
}

fn default_month() -> RangePreset {
    RangePreset::Month
}

fn default_dashboard_limit() -> u32 {
    5
}

fn default_campaign_limit() -> u32 {
    20
}

fn default_summary_days() -> u32 {
    7
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dashboard_range: default_week(),
            senders_range: default_week(),
            campaigns_range: default_month(),
            funnel_range: default_month(),
            dashboard_campaign_limit: default_dashboard_limit(),
            campaign_limit: default_campaign_limit(),
            campaign_metric: RankingMetric::default(),
            summary_days: default_summary_days(),
        }
    }
}

impl PagesConfig {
    pub fn range_for(&self, kind: PageKind) -> RangePreset {
        match kind {
            PageKind::Dashboard => self.dashboard_range,
            PageKind::Senders => self.senders_range,
            PageKind::Campaigns => self.campaigns_range,
            PageKind::Funnel => self.funnel_range,
        }
    }

    /// Range a page starts with: `requested` when the page accepts it,
    /// otherwise the configured default. Custom ranges are always accepted.
    pub fn selection_for(&self, kind: PageKind, requested: Option<RangeSelection>) -> RangeSelection {
        match requested {
            Some(RangeSelection::Preset(preset)) if !kind.range_options().contains(&preset) => {
                RangeSelection::Preset(self.range_for(kind))
            }
            Some(selection) => selection,
            None => RangeSelection::Preset(self.range_for(kind)),
        }
    }
}

/// Terminal UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Redraw interval while idle (ms)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    200
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {} (expected pretty or json)", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Log file; the terminal UI discards logs without one
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

/// Result of searching the default config locations
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from; `None` means defaults plus environment
    pub source: Option<PathBuf>,
    /// Files that exist but failed to read, parse or validate
    pub rejected: Vec<(PathBuf, ConfigError)>,
}

impl LoadedConfig {
    /// One line per rejected file, for stderr
    pub fn rejection_messages(&self) -> Vec<String> {
        self.rejected
            .iter()
            .map(|(path, e)| format!("Ignoring config file {:?}: {}", path, e))
            .collect()
    }

    /// Log where the config came from and every rejected file
    pub fn report(&self) {
        for message in self.rejection_messages() {
            tracing::warn!("{}", message);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here; call [`LoadedConfig::report`] once logging
    /// is installed.
    pub fn load_default() -> LoadedConfig {
        Self::load_first(&Self::default_paths())
    }

    /// First existing file of `paths` that loads; files that fail are
    /// collected and skipped.
    pub fn load_first(paths: &[PathBuf]) -> LoadedConfig {
        let mut rejected = Vec::new();
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::load_with_env(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        rejected,
                    }
                }
                Err(e) => rejected.push((path.clone(), e)),
            }
        }

        LoadedConfig {
            config: Self::from_env(),
            source: None,
            rejected,
        }
    }

    /// Search order for the config file
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("mailscope").join("config.toml")),
            Some(PathBuf::from("/etc/mailscope/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("MAILSCOPE_API_URL") {
            self.api.base_url = url;
        }
        if let Some(level) = lookup("MAILSCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("MAILSCOPE_LOG_FORMAT") {
            match format.parse() {
                Ok(f) => self.logging.format = f,
                Err(e) => tracing::warn!("Ignoring MAILSCOPE_LOG_FORMAT: {}", e),
            }
        }
    }

    /// Reject values the pages cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in PageKind::ALL {
            let preset = self.pages.range_for(kind);
            if !kind.range_options().contains(&preset) {
                return Err(ConfigError::Invalid {
                    field: format!("pages.{}_range", kind.tab().to_lowercase()),
                    message: format!("{} is not offered by the {} page", preset, kind),
                });
            }
        }

        let positive = [
            ("pages.dashboard_campaign_limit", self.pages.dashboard_campaign_limit),
            ("pages.campaign_limit", self.pages.campaign_limit),
            ("pages.summary_days", self.pages.summary_days),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }

        if self.tui.tick_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tui.tick_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Mailscope Configuration
#
# Environment variables override these settings:
# - MAILSCOPE_API_URL
# - MAILSCOPE_LOG_LEVEL
# - MAILSCOPE_LOG_FORMAT

[api]
# Base URL of the insights API
base_url = "http://localhost:8000/api"

# Request timeout in seconds (requests wait indefinitely when unset)
# request_timeout_secs = 30

[pages]
# Initial date range per page: today (dashboard only), week, month, quarter
dashboard_range = "week"
senders_range = "week"
campaigns_range = "month"
funnel_range = "month"

# Campaigns listed on the dashboard
dashboard_campaign_limit = 5

# Campaigns fetched by the campaign analytics page
campaign_limit = 20

# Initial ranking metric: open_rate, click_rate, engagement_score
campaign_metric = "open_rate"

# Days covered by `mailscope summary`
summary_days = 7

[tui]
# Redraw interval while idle (ms)
tick_ms = 200

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path (the terminal UI discards logs without one)
# file = "/var/log/mailscope/mailscope.log"
"#
    .to_string()
}
