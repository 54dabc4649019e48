//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Human-readable console output, always on
//! - JSON log files with rotation when `logging.local_enabled` is set
//! - Level from `application.log_level`, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use shelfsync::config::LoggingConfig;
//! use shelfsync::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(store_id = "eu-shop", "Starting sync");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
