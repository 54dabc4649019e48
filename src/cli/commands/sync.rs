//! Sync command implementation
//!
//! This module implements the `sync` command for pushing spreadsheet rows to
//! their stores.

use super::{build_coordinator, exit_code_for};
use crate::config::load_config;
use crate::core::sync::{ApplyResult, ApplyStatus, SyncFilter, SyncReport};
use crate::domain::{ProductId, StoreId};
use clap::Args;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Only sync rows for this store id
    #[arg(short, long)]
    pub store: Option<String>,

    /// Only sync rows for this internal product id
    #[arg(short, long)]
    pub product: Option<String>,

    /// Look up remote state but send no mutations
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    /// Builds the row filter from the flags
    pub fn filter(&self) -> Result<SyncFilter, String> {
        let mut filter = SyncFilter::all();
        if let Some(store) = &self.store {
            filter = filter.with_store(StoreId::new(store.clone())?);
        }
        if let Some(product) = &self.product {
            filter = filter.with_product(ProductId::new(product.clone())?);
        }
        Ok(filter)
    }

    /// Execute the sync command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let filter = match self.filter() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Invalid filter: {e}");
                return Ok(2);
            }
        };

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        let dry_run = config.application.dry_run;

        if dry_run && !self.json {
            println!("🔍 DRY RUN MODE - No changes will be sent to any store");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !dry_run {
            println!("Sync Configuration:");
            println!("  Stores: {}", self.store.as_deref().unwrap_or("All"));
            println!("  Products: {}", self.product.as_deref().unwrap_or("All"));
            println!("  Max concurrency: {}", config.sync.max_concurrency);
            println!();
            print!("Proceed with sync? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Sync cancelled.");
                return Ok(0);
            }
        }

        let coordinator = match build_coordinator(&config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create sync coordinator");
                eprintln!("Failed to initialize sync: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if !self.json {
            println!("🚀 Starting sync...");
            println!();
        }

        let report = match coordinator.sync(&filter).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Sync failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }

        Ok(if report.is_successful() { 0 } else { 1 })
    }
}

fn print_report(report: &SyncReport) {
    for result in &report.results {
        println!("  {}", format_result(result));
    }
    if !report.results.is_empty() {
        println!();
    }

    println!("📊 Sync Summary:");
    println!("  Processed: {}", report.processed);
    println!("  Succeeded: {}", report.succeeded());
    println!("  Skipped: {}", report.skipped());
    println!("  Failed: {}", report.failed());
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", report.success_rate());
    println!();

    if report.processed == 0 {
        println!("✅ Nothing to sync");
    } else if report.is_successful() {
        println!("✅ Sync completed successfully!");
    } else {
        println!("⚠️  Sync completed with failures");
    }
}

fn format_result(result: &ApplyResult) -> String {
    let icon = match result.status {
        ApplyStatus::Success => "✅",
        ApplyStatus::Skipped => "⏭️ ",
        ApplyStatus::Error => "❌",
    };
    let action = result.action.map(|a| a.as_str()).unwrap_or("-");

    let mut line = format!(
        "{icon} row {} [{}/{}] {action}",
        result.row_number,
        result.store_id.as_deref().unwrap_or("-"),
        result.internal_product_id.as_deref().unwrap_or("-"),
    );
    if let Some(remote_id) = &result.remote_id {
        line.push_str(&format!(" -> {remote_id}"));
    }
    if let Some(note) = &result.note {
        line.push_str(&format!(" ({note})"));
    }
    if let Some(error) = &result.error {
        line.push_str(&format!(": {error}"));
    }
    line
}
