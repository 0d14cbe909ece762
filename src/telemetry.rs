//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install the global subscriber: stdout plus an optional append-only log file.
///
/// `RUST_LOG` takes precedence over the configured level; debug mode lowers
/// the configured level to `debug`.
pub fn init(logging: &LoggingConfig, debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("puno_explorer={level},tower_http={level},warn")));

    let file_layer = if logging.file_path.is_empty() {
        None
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&logging.file_path)
            .with_context(|| format!("Failed to open log file {}", logging.file_path))?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .with_context(|| "Failed to install tracing subscriber")?;

    Ok(())
}
