//! External system integrations for shelfsync.
//!
//! - [`sheets`] - catalog spreadsheet sources (Google Sheets, local workbook file)
//! - [`platform`] - remote commerce platforms (Shopify Admin GraphQL)
//! - [`credentials`] - per-store access token resolution
//!
//! # Design Pattern
//!
//! Each integration sits behind a trait ([`sheets::TableSource`],
//! [`platform::CommercePlatform`], [`credentials::CredentialProvider`]) so the
//! sync engine can be driven by in-memory fakes in tests.
//!
//! ```rust,no_run
//! use shelfsync::adapters::platform::create_platform;
//! use shelfsync::adapters::sheets::create_source;
//! use shelfsync::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("shelfsync.toml")?;
//! let source = create_source(&config.source)?;
//! let platform = create_platform(&config.platform)?;
//!
//! let stores = source.load_table(&config.source.stores_table).await?;
//! println!("{} stores on {}", stores.rows.len(), platform.name());
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod platform;
pub mod sheets;
