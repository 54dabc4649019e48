//! Core reconciliation engine for shelfsync.
//!
//! # Modules
//!
//! - [`index`] - typed catalog built from the spreadsheet tables
//! - [`resolver`] - live lookups of owned products in a store
//! - [`classify`] - decides create, update, delete or skip per row
//! - [`payload`] - merges catalog, store and row into the outbound product
//! - [`apply`] - carries out a classified row against the store
//! - [`sync`] - preview and sync orchestration and reporting
//!
//! # Sync Workflow
//!
//! 1. **Load**: Read the stores, products and store-product tables fresh
//! 2. **Index**: Validate rows and build typed lookups
//! 3. **Credentials**: Resolve a token for every store the rows touch
//! 4. **Classify**: Query the store by SKU and ownership marker
//! 5. **Apply**: Create, update or delete, recording the outcome per row
//! 6. **Report**: Return every eligible row with its status
//!
//! # Example
//!
//! ```rust,no_run
//! use shelfsync::adapters::credentials::ConfigCredentials;
//! use shelfsync::adapters::platform::create_platform;
//! use shelfsync::adapters::sheets::create_source;
//! use shelfsync::config::load_config;
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
//! println!("Processed: {}", report.processed);
//! println!("Failed: {}", report.failed());
//! # Ok(())
//! # }
//! ```

pub mod apply;
pub mod classify;
pub mod index;
pub mod payload;
pub mod resolver;
pub mod sync;

#[cfg(test)]
pub(crate) mod fake;
