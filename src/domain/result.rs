//! Result type alias for shelfsync

use super::errors::SyncError;

/// Result type alias for shelfsync operations
///
/// # Examples
///
/// ```
/// use shelfsync::domain::result::Result;
/// use shelfsync::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
