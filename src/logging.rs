//! Tracing setup
//!
//! `RUST_LOG` wins over the configured level. The terminal UI owns the
//! screen, so in that mode events go to the configured file or nowhere.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Where log events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Command output on stdout, logs on stderr (or the log file)
    Cli,
    /// Full-screen UI: log file or discard
    Interactive,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log filter {0:?}")]
    Filter(String),

    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Filter directive for a configured level; bare levels apply to this crate
pub fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("mailscope={}", level)
    }
}

fn make_writer(config: &LoggingConfig, mode: LogMode) -> Result<(BoxMakeWriter, bool), LoggingError> {
    if let Some(path) = &config.file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggingError::File {
                path: path.clone(),
                source,
            })?;
        return Ok((BoxMakeWriter::new(Mutex::new(file)), false));
    }

    Ok(match mode {
        LogMode::Cli => (BoxMakeWriter::new(std::io::stderr), true),
        LogMode::Interactive => (BoxMakeWriter::new(std::io::sink), false),
    })
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig, mode: LogMode) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = filter_directive(&config.level);
            EnvFilter::try_new(&directive).map_err(|_| LoggingError::Filter(directive))?
        }
    };
    let (writer, ansi) = make_writer(config, mode)?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))
}
