//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for shelfsync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// shelfsync - spreadsheet catalog to commerce store sync
#[derive(Parser, Debug)]
#[command(name = "shelfsync")]
#[command(version, about, long_about = None)]
#[command(author = "shelfsync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "shelfsync.toml", env = "SHELFSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SHELFSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what a sync would do for one store, without changing anything
    Preview(commands::preview::PreviewArgs),

    /// Push catalog rows to their stores
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command reads the configuration file
    pub fn needs_config(&self) -> bool {
        !matches!(self, Commands::Init(_))
    }
}
