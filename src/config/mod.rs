//! Configuration management for shelfsync.
//!
//! shelfsync reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SHELFSYNC_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level, dry run
//! - [`SourceConfig`] - where the catalog spreadsheet lives and its table names
//! - [`PlatformConfig`] - remote platform API settings
//! - [`SyncSettings`] - batch execution settings
//! - `credentials` - access tokens keyed by store id
//! - [`LoggingConfig`] - local log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! kind = "google"
//! spreadsheet_id = "1AbCdEfGh"
//! api_key = "${SHELFSYNC_SHEETS_API_KEY}"
//!
//! [platform]
//! api_version = "2025-01"
//!
//! [credentials]
//! eu-shop = "${SHELFSYNC_EU_TOKEN}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, LoggingConfig, PlatformConfig, PlatformKind, ShelfsyncConfig,
    SourceConfig, SourceKind, SyncSettings,
};
pub use secret::{secret_string, SecretString, SecretValue};
