//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "shelfsync.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing shelfsync configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your spreadsheet id", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set SHELFSYNC_SHEETS_API_KEY");
                println!("     - Set SHELFSYNC_TOKEN_<STORE_ID> for every store");
                println!("  3. Validate configuration: shelfsync validate-config");
                println!("  4. Preview a store: shelfsync preview --store <id>");
                println!("  5. Run sync: shelfsync sync");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Starter configuration
    fn generate_config() -> String {
        r#"# shelfsync Configuration File
# Spreadsheet catalog to commerce store sync

[application]
log_level = "info"
# Look up remote state but send no mutations
dry_run = false

[source]
kind = "google"  # google | file
spreadsheet_id = "your-spreadsheet-id"
api_key = "${SHELFSYNC_SHEETS_API_KEY}"
# path = "catalog.json"  # when kind = "file"
stores_table = "Stores"
products_table = "Products"
rows_table = "StoreProducts"
timeout_seconds = 30

[platform]
kind = "shopify"
api_version = "2025-01"
timeout_seconds = 30

[sync]
# Rows applied at once (1-8); 1 is strictly sequential
max_concurrency = 1

# Access tokens keyed by store id. Stores missing here are read from
# SHELFSYNC_TOKEN_<STORE_ID>, e.g. SHELFSYNC_TOKEN_EU_SHOP.
[credentials]
# eu-shop = "${SHELFSYNC_EU_SHOP_TOKEN}"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }
}
