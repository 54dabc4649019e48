//! Domain error types
//!
//! This module defines the error hierarchy for shelfsync. Adapter errors are
//! mapped into domain variants so third-party client types never leak out of
//! the adapters.
//!
//! Only [`SyncError::Configuration`] and [`SyncError::Source`] abort a whole
//! request. Lookup, mapping and apply failures are recorded on the affected
//! row and the batch carries on.

use thiserror::Error;

/// Main shelfsync error type
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration errors (bad config file, missing credential, missing table or header)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source-of-truth loader errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Remote platform errors outside of a row lookup
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Remote lookup errors raised while resolving a row
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// A row references a store or product that is not in the catalog
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// A remote mutation failed
    #[error("Apply error: {0}")]
    Apply(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Remote commerce platform errors
///
/// Raised by [`crate::adapters::platform::CommercePlatform`] implementations.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to reach the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Access token rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Top-level GraphQL errors
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Mutation rejected with user errors
    #[error("Mutation rejected: {0}")]
    UserErrors(String),

    /// Response body did not match the expected shape
    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Errors raised while resolving a row against remote state
#[derive(Debug, Error)]
pub enum LookupError {
    /// The remote query itself failed
    #[error("Remote lookup failed: {0}")]
    Platform(#[from] PlatformError),

    /// More than one owned active product carries the same SKU
    #[error(
        "{count} owned active products match sku '{sku}': {ids}",
        count = .remote_ids.len(),
        ids = .remote_ids.join(", ")
    )]
    AmbiguousMatch { sku: String, remote_ids: Vec<String> },
}

/// Source-of-truth (spreadsheet) errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// The named table does not exist
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Failed to reach the sheet provider
    #[error("Failed to connect to sheet source: {0}")]
    ConnectionFailed(String),

    /// Non-success response from the sheet provider
    #[error("Sheet request failed: {status} - {message}")]
    RequestFailed { status: u16, message: String },

    /// The table payload could not be interpreted
    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    /// Local file could not be read
    #[error("Failed to read workbook: {0}")]
    Io(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
