//! CLI command implementations
//!
//! Exit codes shared by the commands:
//! - 0: success
//! - 1: completed with row failures
//! - 2: configuration error
//! - 4: spreadsheet source unreachable
//! - 5: fatal error

pub mod init;
pub mod preview;
pub mod sync;
pub mod validate;

use crate::adapters::credentials::ConfigCredentials;
use crate::adapters::platform::create_platform;
use crate::adapters::sheets::create_source;
use crate::config::ShelfsyncConfig;
use crate::core::sync::{SyncCoordinator, SyncOptions};
use crate::domain::{Result, SyncError};
use std::sync::Arc;

/// Wires a coordinator from configuration
pub(crate) fn build_coordinator(config: &ShelfsyncConfig) -> Result<SyncCoordinator> {
    let source = create_source(&config.source)?;
    let platform = create_platform(&config.platform)?;
    let credentials = Arc::new(ConfigCredentials::from_config(config));

    Ok(SyncCoordinator::new(
        source,
        platform,
        credentials,
        SyncOptions::from_config(config),
    ))
}

/// Maps a request-level error to an exit code
pub(crate) fn exit_code_for(error: &SyncError) -> i32 {
    match error {
        SyncError::Configuration(_) => 2,
        SyncError::Source(_) => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&SyncError::Configuration("x".to_string())), 2);
        assert_eq!(
            exit_code_for(&SyncError::Source(SourceError::ConnectionFailed(
                "down".to_string()
            ))),
            4
        );
        assert_eq!(exit_code_for(&SyncError::Io("disk".to_string())), 5);
    }
}
