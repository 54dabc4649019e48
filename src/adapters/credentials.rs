//! Store credential provider
//!
//! Resolves a store id to the access token used for its platform calls.
//! A store without a token is a configuration problem and fails the whole
//! request, never a single row.

use crate::config::{secret_string, SecretString, ShelfsyncConfig};
use crate::domain::{Result, StoreId, SyncError};
use secrecy::ExposeSecret;
use std::collections::BTreeMap;

/// Resolves store ids to access credentials
pub trait CredentialProvider: Send + Sync {
    /// Access token for a store
    ///
    /// # Errors
    ///
    /// [`SyncError::Configuration`] when no non-blank token is available.
    fn credential_for(&self, store_id: &StoreId) -> Result<SecretString>;
}

/// Credentials from the `[credentials]` config section, with an environment
/// fallback of `SHELFSYNC_TOKEN_<STORE_ID>`
#[derive(Debug, Clone, Default)]
pub struct ConfigCredentials {
    tokens: BTreeMap<String, SecretString>,
}

impl ConfigCredentials {
    pub fn new(tokens: BTreeMap<String, SecretString>) -> Self {
        Self { tokens }
    }

    pub fn from_config(config: &ShelfsyncConfig) -> Self {
        Self::new(config.credentials.clone())
    }
}

impl CredentialProvider for ConfigCredentials {
    fn credential_for(&self, store_id: &StoreId) -> Result<SecretString> {
        if let Some(token) = self.tokens.get(store_id.as_str()) {
            if !token.expose_secret().is_empty() {
                return Ok(token.clone());
            }
        }

        let env_var = store_id.token_env_var();
        match std::env::var(&env_var) {
            Ok(value) if !value.trim().is_empty() => Ok(secret_string(value)),
            _ => Err(SyncError::Configuration(format!(
                "No access token configured for store '{store_id}' (set credentials.{store_id} or {env_var})"
            ))),
        }
    }
}
