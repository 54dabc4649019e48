//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the shelfsync configuration file.

use crate::config::{load_config, ShelfsyncConfig, SourceKind};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        for line in summary_lines(&config) {
            println!("  {line}");
        }
        println!();
        Ok(0)
    }
}

/// Human-readable summary; secrets are never included
fn summary_lines(config: &ShelfsyncConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Log Level: {}", config.application.log_level),
        format!("Dry Run: {}", config.application.dry_run),
    ];

    match config.source.kind {
        SourceKind::Google => {
            lines.push("Source: Google Sheets".to_string());
            lines.push(format!(
                "Spreadsheet: {}",
                config.source.spreadsheet_id.as_deref().unwrap_or("-")
            ));
        }
        SourceKind::File => {
            lines.push("Source: workbook file".to_string());
            lines.push(format!("Path: {}", config.source.path.as_deref().unwrap_or("-")));
        }
    }
    lines.push(format!(
        "Tables: {}, {}, {}",
        config.source.stores_table, config.source.products_table, config.source.rows_table
    ));

    lines.push(format!("Platform API Version: {}", config.platform.api_version));
    if let Some(base) = &config.platform.base_url_override {
        lines.push(format!("Platform Base URL: {base}"));
    }
    lines.push(format!("Max Concurrency: {}", config.sync.max_concurrency));

    let stores: Vec<&str> = config.credentials.keys().map(String::as_str).collect();
    lines.push(format!(
        "Credentials: {}",
        if stores.is_empty() {
            "none in file (environment only)".to_string()
        } else {
            stores.join(", ")
        }
    ));

    if config.logging.local_enabled {
        lines.push(format!(
            "File Logging: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        ));
    }
    lines
}
