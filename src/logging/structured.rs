//! Subscriber setup
//!
//! One `EnvFilter` gates everything. Console output is always on; when
//! `logging.local_enabled` is set, JSON lines also go to `shelfsync.log`
//! under `logging.local_path`, rotated per `logging.local_rotation`.

use crate::config::LoggingConfig;
use crate::domain::{Result, SyncError};
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "shelfsync.log";

/// Flushes the file writer on drop; hold it until the process exits
pub struct LoggingGuard(#[allow(dead_code)] Option<WorkerGuard>);

/// Installs the global subscriber
///
/// `RUST_LOG` wins over `level` when set.
///
/// # Errors
///
/// Configuration error for an unknown level, an unusable log directory, or
/// when a global subscriber is already installed.
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("shelfsync={level}")));

    let (file_layer, file_guard) = if config.local_enabled {
        let (writer, guard) = tracing_appender::non_blocking(file_appender(config)?);
        let layer = fmt::layer()
            .json()
            .with_thread_ids(true)
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .map_err(|e| SyncError::Configuration(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(
        level = %level,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard(file_guard))
}

fn file_appender(config: &LoggingConfig) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to create log directory {}: {e}",
            config.local_path
        ))
    })?;

    Ok(RollingFileAppender::new(
        rotation(&config.local_rotation),
        &config.local_path,
        LOG_FILE_NAME,
    ))
}

fn rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn parse_log_level(raw: &str) -> Result<Level> {
    let raw = raw.trim();
    if raw.is_empty() || raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_level(raw));
    }
    Level::from_str(raw).map_err(|_| invalid_level(raw))
}

fn invalid_level(raw: &str) -> SyncError {
    SyncError::Configuration(format!(
        "Invalid log level: {raw}. Must be one of: trace, debug, info, warn, error"
    ))
}
