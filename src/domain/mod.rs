//! Domain models and types for shelfsync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`StoreId`], [`ProductId`], [`RemoteId`])
//! - **Catalog records** ([`Store`], [`Product`], [`StoreRow`])
//! - **Actions** ([`SyncAction`] declared in the sheet, [`PlannedAction`] decided by the engine)
//! - **Remote entities** ([`RemoteEntity`], [`RemoteEntityPayload`]) and the [`OWNERSHIP_MARKER`]
//! - **Error types** ([`SyncError`], [`PlatformError`], [`LookupError`], [`SourceError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use shelfsync::domain::{ProductId, StoreId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store_id = StoreId::new("eu-shop")?;
//! let product_id = ProductId::new("P-100")?;
//!
//! // This won't compile - a product id is not a store id
//! // let wrong: StoreId = product_id;
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod catalog;
pub mod errors;
pub mod ids;
pub mod remote;
pub mod result;

// Re-export commonly used types for convenience
pub use action::{Classification, PlannedAction, SyncAction};
pub use catalog::{Product, Store, StoreRow};
pub use errors::{LookupError, PlatformError, SourceError, SyncError};
pub use ids::{ProductId, RemoteId, StoreId};
pub use remote::{RemoteEntity, RemoteEntityPayload, OWNERSHIP_MARKER};
pub use result::Result;
