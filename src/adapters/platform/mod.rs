//! Remote commerce platform adapters
//!
//! [`CommercePlatform`] is the seam between the sync engine and a store's
//! admin API. The engine never builds requests itself; it asks the platform
//! to find, create, update or delete products in the store named by a
//! [`StoreSession`].

pub mod models;
pub mod shopify;

pub use shopify::ShopifyPlatform;

use crate::config::{PlatformConfig, PlatformKind, SecretString};
use crate::domain::{PlatformError, RemoteEntity, RemoteEntityPayload, RemoteId, Result, Store};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Result type for platform calls
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// A store paired with the token used to talk to it
#[derive(Debug, Clone)]
pub struct StoreSession {
    store: Store,
    credential: SecretString,
}

impl StoreSession {
    pub fn new(store: Store, credential: SecretString) -> Self {
        Self { store, credential }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn access_token(&self) -> &str {
        self.credential.expose_secret().as_ref()
    }
}

/// Remote store operations used by the sync engine
///
/// Implementations report raw remote state. Ownership and activity filtering
/// is done by the resolver, not here.
#[async_trait]
pub trait CommercePlatform: Send + Sync {
    /// Products having a variant whose SKU equals `sku` exactly
    async fn find_by_sku(&self, session: &StoreSession, sku: &str)
        -> PlatformResult<Vec<RemoteEntity>>;

    /// The product with this handle, if any
    async fn find_by_handle(
        &self,
        session: &StoreSession,
        handle: &str,
    ) -> PlatformResult<Option<RemoteEntity>>;

    /// Create a product and return its remote id
    async fn create_product(
        &self,
        session: &StoreSession,
        payload: &RemoteEntityPayload,
    ) -> PlatformResult<RemoteId>;

    /// Overwrite an existing product and return its remote id
    async fn update_product(
        &self,
        session: &StoreSession,
        remote_id: &RemoteId,
        payload: &RemoteEntityPayload,
    ) -> PlatformResult<RemoteId>;

    /// Delete a product
    async fn delete_product(&self, session: &StoreSession, remote_id: &RemoteId)
        -> PlatformResult<()>;

    /// Platform name for logs
    fn name(&self) -> &str;
}

/// Creates the platform selected by configuration
pub fn create_platform(config: &PlatformConfig) -> Result<Arc<dyn CommercePlatform>> {
    let platform: Arc<dyn CommercePlatform> = match config.kind {
        PlatformKind::Shopify => Arc::new(ShopifyPlatform::new(config)?),
    };

    tracing::debug!(
        platform = platform.name(),
        api_version = %config.api_version,
        "Created commerce platform"
    );
    Ok(platform)
}
