//! Batch orchestration
//!
//! [`SyncCoordinator`] is the entry point used by the CLI: `preview` classifies
//! one store's rows read-only, `sync` classifies and applies every row passing
//! a [`SyncFilter`] and returns a [`SyncReport`].

pub mod coordinator;
pub mod report;

pub use coordinator::{SyncCoordinator, SyncOptions};
pub use report::{ApplyResult, ApplyStatus, PreviewEntry, SyncFilter, SyncReport};
