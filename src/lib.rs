// shelfsync - Spreadsheet Catalog to Commerce Store Sync
// Copyright (c) 2025 shelfsync Contributors
// Licensed under the MIT License

//! # shelfsync - Spreadsheet Catalog to Commerce Store Sync
//!
//! shelfsync reconciles a product catalog kept in a spreadsheet with the
//! products living in one or more remote commerce stores.
//!
//! ## Overview
//!
//! The spreadsheet holds three tables:
//! - **Stores**: one row per remote store, with its domain and price multiplier
//! - **Products**: the master catalog
//! - **StoreProducts**: per-store rows declaring an action (create, update or
//!   delete) plus optional overrides
//!
//! Every request reads the tables fresh, looks up what already exists in each
//! store, and decides per row what to actually do. Products shelfsync creates
//! carry the `shelfsync:managed` tag, and only tagged products are ever
//! matched, updated or deleted.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Catalog index, resolver, classifier, payload builder,
//!   apply executor and the sync coordinator
//! - [`adapters`] - Spreadsheet sources, commerce platforms, credentials
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shelfsync::config::load_config;
//! use shelfsync::adapters::credentials::ConfigCredentials;
//! use shelfsync::adapters::platform::create_platform;
//! use shelfsync::adapters::sheets::create_source;
//! use shelfsync::core::sync::{SyncCoordinator, SyncFilter, SyncOptions};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("shelfsync.toml")?;
//!
//! let coordinator = SyncCoordinator::new(
//!     create_source(&config.source)?,
//!     create_platform(&config.platform)?,
//!     Arc::new(ConfigCredentials::from_config(&config)),
//!     SyncOptions::from_config(&config),
//! );
//!
//! let report = coordinator.sync(&SyncFilter::all()).await?;
//! println!("Processed {} rows, {} failed", report.processed, report.failed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All library errors are [`domain::SyncError`]. Only configuration and
//! source errors fail a whole request; anything that goes wrong for a single
//! row is reported on that row's [`core::sync::ApplyResult`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
