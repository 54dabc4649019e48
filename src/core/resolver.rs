//! Remote resolver
//!
//! Answers "does this store already hold our product?" against live remote
//! state. Nothing is cached; every call goes to the platform.

use crate::adapters::platform::{CommercePlatform, StoreSession};
use crate::domain::{LookupError, RemoteEntity};
use std::sync::Arc;

#[derive(Clone)]
pub struct RemoteResolver {
    platform: Arc<dyn CommercePlatform>,
}

impl RemoteResolver {
    pub fn new(platform: Arc<dyn CommercePlatform>) -> Self {
        Self { platform }
    }

    /// The owned, active product carrying this SKU
    ///
    /// A blank SKU resolves to `None` without a remote call. Variants of the
    /// same product count once.
    ///
    /// # Errors
    ///
    /// [`LookupError::AmbiguousMatch`] when several distinct owned active
    /// products carry the SKU, [`LookupError::Platform`] when the query fails.
    pub async fn resolve_by_sku_and_marker(
        &self,
        session: &StoreSession,
        sku: &str,
    ) -> Result<Option<RemoteEntity>, LookupError> {
        let sku = sku.trim();
        if sku.is_empty() {
            return Ok(None);
        }

        let candidates = self.platform.find_by_sku(session, sku).await?;
        let total = candidates.len();

        let mut owned: Vec<RemoteEntity> = Vec::new();
        for entity in candidates {
            if !(entity.is_active() && entity.is_owned()) {
                continue;
            }
            if owned.iter().any(|seen| seen.remote_id == entity.remote_id) {
                continue;
            }
            owned.push(entity);
        }

        tracing::debug!(
            store_id = %session.store().store_id,
            sku = %sku,
            candidates = total,
            owned = owned.len(),
            "Resolved sku"
        );

        match owned.len() {
            0 => Ok(None),
            1 => Ok(owned.pop()),
            _ => Err(LookupError::AmbiguousMatch {
                sku: sku.to_string(),
                remote_ids: owned
                    .into_iter()
                    .map(|entity| entity.remote_id.into_inner())
                    .collect(),
            }),
        }
    }

    /// The product with this handle, owned or not
    ///
    /// Only used as a fallback after a SKU+marker miss.
    pub async fn resolve_by_handle(
        &self,
        session: &StoreSession,
        handle: &str,
    ) -> Result<Option<RemoteEntity>, LookupError> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Ok(None);
        }

        Ok(self.platform.find_by_handle(session, handle).await?)
    }
}
