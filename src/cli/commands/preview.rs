//! Preview command implementation
//!
//! This module implements the `preview` command, which classifies one
//! store's rows against live remote state without sending any mutation.

use super::{build_coordinator, exit_code_for};
use crate::config::load_config;
use crate::core::sync::PreviewEntry;
use crate::domain::StoreId;
use clap::Args;

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Store id to preview
    #[arg(short, long)]
    pub store: String,

    /// Print entries as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl PreviewArgs {
    /// Execute the preview command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(store_id = %self.store, "Starting preview command");

        let store_id = match StoreId::new(self.store.clone()) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid store id: {e}");
                return Ok(2);
            }
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let coordinator = match build_coordinator(&config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize preview");
                eprintln!("Failed to initialize preview: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let entries = match coordinator.preview(&store_id).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(error = %e, "Preview failed");
                eprintln!("Preview failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            print_table(&store_id, &entries);
        }

        let failed = entries.iter().filter(|e| e.error.is_some()).count();
        Ok(if failed > 0 { 1 } else { 0 })
    }
}

fn print_table(store_id: &StoreId, entries: &[PreviewEntry]) {
    println!("🔍 Preview for store {store_id}");
    println!();

    if entries.is_empty() {
        println!("No rows with a create, update or delete action.");
        return;
    }

    println!("  {:>5}  {:<16} {:<20} {:<8} DETAIL", "ROW", "PRODUCT", "SKU", "ACTION");
    for entry in entries {
        println!("  {}", format_entry(entry));
    }
    println!();
}

fn format_entry(entry: &PreviewEntry) -> String {
    let product = entry.internal_product_id.as_deref().unwrap_or("-");
    let sku = entry.sku.as_deref().unwrap_or("-");

    match (&entry.classification, &entry.error) {
        (_, Some(error)) => format!(
            "{:>5}  {:<16} {:<20} {:<8} ❌ {}",
            entry.row_number, product, sku, "error", error
        ),
        (Some(classification), None) => {
            let detail = match &classification.matched_remote_id {
                Some(remote_id) => format!("{} ({})", classification.reason, remote_id),
                None => classification.reason.clone(),
            };
            format!(
                "{:>5}  {:<16} {:<20} {:<8} {}",
                entry.row_number, product, sku, classification.planned_action.as_str(), detail
            )
        }
        (None, None) => format!("{:>5}  {:<16} {:<20} {:<8}", entry.row_number, product, sku, "-"),
    }
}
