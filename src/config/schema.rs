//! Configuration schema types
//!
//! Maps one-to-one onto the sections of `shelfsync.toml`.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the catalog spreadsheet is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Google Sheets values API
    Google,
    /// Local JSON workbook export
    File,
}

/// Remote commerce platform flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Shopify GraphQL Admin API
    #[default]
    Shopify,
}

/// Main shelfsync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfsyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Spreadsheet source settings
    pub source: SourceConfig,

    /// Remote platform settings
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Batch execution settings
    #[serde(default)]
    pub sync: SyncSettings,

    /// Access tokens keyed by store id
    ///
    /// Stores without an entry here fall back to the
    /// `SHELFSYNC_TOKEN_<STORE_ID>` environment variable.
    #[serde(default)]
    pub credentials: BTreeMap<String, SecretString>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShelfsyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.platform.validate()?;
        self.sync.validate()?;
        self.logging.validate()?;

        for store_id in self.credentials.keys() {
            if store_id.trim().is_empty() {
                return Err("credentials cannot contain an empty store id".to_string());
            }
        }
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (resolve and classify, but never mutate remote stores)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Spreadsheet source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source kind (google or file)
    pub kind: SourceKind,

    /// Spreadsheet id (google)
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// API key (google)
    /// Stored securely in memory and zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Path to a JSON workbook (file)
    #[serde(default)]
    pub path: Option<String>,

    /// Sheets API base URL
    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,

    /// Name of the stores table
    #[serde(default = "default_stores_table")]
    pub stores_table: String,

    /// Name of the catalog table
    #[serde(default = "default_products_table")]
    pub products_table: String,

    /// Name of the per-store rows table
    #[serde(default = "default_rows_table")]
    pub rows_table: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        match self.kind {
            SourceKind::Google => {
                if self
                    .spreadsheet_id
                    .as_deref()
                    .map(|s| s.trim().is_empty())
                    .unwrap_or(true)
                {
                    return Err(
                        "source.spreadsheet_id is required when source.kind = 'google'"
                            .to_string(),
                    );
                }
                if self
                    .api_key
                    .as_ref()
                    .map(|k| k.expose_secret().is_empty())
                    .unwrap_or(true)
                {
                    return Err(
                        "source.api_key is required when source.kind = 'google'".to_string()
                    );
                }
                if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://")
                {
                    return Err("source.base_url must start with http:// or https://".to_string());
                }
            }
            SourceKind::File => {
                if self
                    .path
                    .as_deref()
                    .map(|s| s.trim().is_empty())
                    .unwrap_or(true)
                {
                    return Err("source.path is required when source.kind = 'file'".to_string());
                }
            }
        }

        for (key, table) in [
            ("stores_table", &self.stores_table),
            ("products_table", &self.products_table),
            ("rows_table", &self.rows_table),
        ] {
            if table.trim().is_empty() {
                return Err(format!("source.{key} cannot be empty"));
            }
        }

        if self.timeout_seconds == 0 {
            return Err("source.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Remote platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platform kind
    #[serde(default)]
    pub kind: PlatformKind,

    /// Admin API version, e.g. `2025-01`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Replaces `https://{store domain}` when set (proxies, local testing)
    #[serde(default)]
    pub base_url_override: Option<String>,
}

impl PlatformConfig {
    fn validate(&self) -> Result<(), String> {
        let version_ok = self.api_version.len() == 7
            && self.api_version.as_bytes()[4] == b'-'
            && self
                .api_version
                .chars()
                .enumerate()
                .all(|(i, c)| i == 4 || c.is_ascii_digit());
        if !version_ok {
            return Err(format!(
                "Invalid platform.api_version '{}'. Expected YYYY-MM",
                self.api_version
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("platform.timeout_seconds must be > 0".to_string());
        }

        if let Some(base) = &self.base_url_override {
            url::Url::parse(base)
                .map_err(|e| format!("Invalid platform.base_url_override '{base}': {e}"))?;
        }
        Ok(())
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            kind: PlatformKind::default(),
            api_version: default_api_version(),
            timeout_seconds: default_timeout_seconds(),
            base_url_override: None,
        }
    }
}

/// Batch execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Rows applied at once; 1 means strictly sequential
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl SyncSettings {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 || self.max_concurrency > 8 {
            return Err(format!(
                "sync.max_concurrency must be between 1 and 8, got {}",
                self.max_concurrency
            ));
        }
        Ok(())
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_stores_table() -> String {
    "Stores".to_string()
}

fn default_products_table() -> String {
    "Products".to_string()
}

fn default_rows_table() -> String {
    "StoreProducts".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_api_version() -> String {
    "2025-01".to_string()
}

fn default_max_concurrency() -> usize {
    1
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
