//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ShelfsyncConfig, SourceKind};
use super::secret::secret_string;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Substitutes `${VAR}` placeholders from the environment
/// 3. Parses the TOML into [`ShelfsyncConfig`]
/// 4. Applies `SHELFSYNC_*` environment overrides
/// 5. Validates the result
///
/// # Errors
///
/// Every failure is a [`SyncError::Configuration`].
///
/// # Examples
///
/// ```no_run
/// use shelfsync::config::loader::load_config;
///
/// let config = load_config("shelfsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ShelfsyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text, with the same substitution,
/// override and validation steps as [`load_config`]
pub fn parse_config(contents: &str) -> Result<ShelfsyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ShelfsyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. Every referenced variable must be set.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SyncError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `SHELFSYNC_*` prefix
///
/// Variables follow `SHELFSYNC_<SECTION>_<KEY>`, e.g. `SHELFSYNC_SOURCE_PATH`.
/// Unparseable numeric or boolean values are ignored.
fn apply_env_overrides(config: &mut ShelfsyncConfig) {
    if let Ok(val) = std::env::var("SHELFSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("SHELFSYNC_APPLICATION_DRY_RUN") {
        if let Ok(dry_run) = val.parse() {
            config.application.dry_run = dry_run;
        }
    }

    if let Ok(val) = std::env::var("SHELFSYNC_SOURCE_KIND") {
        match val.to_lowercase().as_str() {
            "google" => config.source.kind = SourceKind::Google,
            "file" => config.source.kind = SourceKind::File,
            other => tracing::warn!(value = %other, "Ignoring unknown SHELFSYNC_SOURCE_KIND"),
        }
    }
    if let Ok(val) = std::env::var("SHELFSYNC_SOURCE_SPREADSHEET_ID") {
        config.source.spreadsheet_id = Some(val);
    }
    if let Ok(val) = std::env::var("SHELFSYNC_SOURCE_API_KEY") {
        config.source.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("SHELFSYNC_SOURCE_PATH") {
        config.source.path = Some(val);
    }

    if let Ok(val) = std::env::var("SHELFSYNC_PLATFORM_API_VERSION") {
        config.platform.api_version = val;
    }
    if let Ok(val) = std::env::var("SHELFSYNC_PLATFORM_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.platform.timeout_seconds = timeout;
        }
    }

    if let Ok(val) = std::env::var("SHELFSYNC_SYNC_MAX_CONCURRENCY") {
        if let Ok(concurrency) = val.parse() {
            config.sync.max_concurrency = concurrency;
        }
    }

    if let Ok(val) = std::env::var("SHELFSYNC_LOGGING_LOCAL_ENABLED") {
        if let Ok(enabled) = val.parse() {
            config.logging.local_enabled = enabled;
        }
    }
    if let Ok(val) = std::env::var("SHELFSYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
