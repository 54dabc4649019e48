//! Shared fixtures for integration tests
//!
//! In-memory stand-ins for the spreadsheet, the remote store and the
//! credential store, plus a coordinator builder wired to them.

#![allow(dead_code)]

use async_trait::async_trait;
use shelfsync::adapters::credentials::CredentialProvider;
use shelfsync::adapters::platform::{CommercePlatform, PlatformResult, StoreSession};
use shelfsync::adapters::sheets::{Table, TableSource};
use shelfsync::config::{secret_string, SecretString};
use shelfsync::core::sync::{SyncCoordinator, SyncOptions};
use shelfsync::domain::{
    PlatformError, RemoteEntity, RemoteEntityPayload, RemoteId, Result, SourceError, StoreId,
    SyncError, OWNERSHIP_MARKER,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const STORE_HEADERS: &[&str] = &["store_id", "domain", "currency", "price_multiplier"];
pub const PRODUCT_HEADERS: &[&str] = &[
    "internal_product_id",
    "master_sku",
    "internal_name",
    "base_price",
    "tags",
];
pub const ROW_HEADERS: &[&str] = &[
    "store_id",
    "internal_product_id",
    "sync_action",
    "store_sku",
    "title",
    "handle",
    "price",
];

fn grid(headers: &[&str], rows: &[&[&str]]) -> Vec<Vec<String>> {
    std::iter::once(headers)
        .chain(rows.iter().copied())
        .map(|cells| cells.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// Spreadsheet held in memory; every load returns the current contents
#[derive(Default)]
pub struct MemorySource {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemorySource {
    /// Source with one store `eu` and the given catalog products and rows
    pub fn new(products: &[&[&str]], rows: &[&[&str]]) -> Self {
        Self::default()
            .with_table(
                "Stores",
                STORE_HEADERS,
                &[&["eu", "eu.myshopify.com", "EUR", "1.0"]],
            )
            .with_table("Products", PRODUCT_HEADERS, products)
            .with_table("StoreProducts", ROW_HEADERS, rows)
    }

    pub fn with_table(self, name: &str, headers: &[&str], rows: &[&[&str]]) -> Self {
        self.set_table(name, headers, rows);
        self
    }

    pub fn set_table(&self, name: &str, headers: &[&str], rows: &[&[&str]]) {
        self.tables
            .lock()
            .unwrap()
            .insert(name.to_string(), Table::from_grid(name, grid(headers, rows)));
    }

    pub fn without_table(self, name: &str) -> Self {
        self.tables.lock().unwrap().remove(name);
        self
    }
}

#[async_trait]
impl TableSource for MemorySource {
    async fn load_table(&self, name: &str) -> std::result::Result<Table, SourceError> {
        self.tables
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::TableNotFound(name.to_string()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Default)]
struct PlatformState {
    products: Vec<RemoteEntity>,
    calls: Vec<String>,
    next_id: u32,
    failing_skus: HashSet<String>,
    delays: HashMap<String, Duration>,
}

/// Remote store held in memory, recording every call
#[derive(Default)]
pub struct MemoryPlatform {
    state: Mutex<PlatformState>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a remote product with a single variant
    pub fn with_product(self, id: &str, sku: &str, handle: &str, status: &str, owned: bool) -> Self {
        let tags = if owned {
            vec!["existing".to_string(), OWNERSHIP_MARKER.to_string()]
        } else {
            vec!["existing".to_string()]
        };
        self.state.lock().unwrap().products.push(RemoteEntity {
            remote_id: RemoteId::new(id).unwrap(),
            sku: Some(sku.to_string()),
            status: status.to_string(),
            tags,
            title: sku.to_string(),
            handle: handle.to_string(),
        });
        self
    }

    /// Every call touching this SKU fails with a server error
    pub fn failing_sku(self, sku: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_skus
            .insert(sku.to_string());
        self
    }

    /// SKU lookups for this SKU take `delay` before answering
    pub fn slow_sku(self, sku: &str, delay: Duration) -> Self {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert(sku.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| !call.starts_with("find_"))
            .collect()
    }

    pub fn products(&self) -> Vec<RemoteEntity> {
        self.state.lock().unwrap().products.clone()
    }

    pub fn products_with_sku(&self, sku: &str) -> Vec<RemoteEntity> {
        self.products()
            .into_iter()
            .filter(|p| p.sku.as_deref() == Some(sku))
            .collect()
    }

    fn server_error() -> PlatformError {
        PlatformError::ServerError {
            status: 503,
            message: "service unavailable".to_string(),
        }
    }
}

fn apply_payload(entity: &mut RemoteEntity, payload: &RemoteEntityPayload) {
    entity.title = payload.title.clone();
    entity.sku = Some(payload.sku.clone());
    entity.tags = payload.tags.clone();
    entity.status = payload.status.to_uppercase();
    if let Some(handle) = &payload.handle {
        entity.handle = handle.clone();
    }
}

#[async_trait]
impl CommercePlatform for MemoryPlatform {
    async fn find_by_sku(
        &self,
        _session: &StoreSession,
        sku: &str,
    ) -> PlatformResult<Vec<RemoteEntity>> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("find_by_sku:{sku}"));
            state.delays.get(sku).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock().unwrap();
        if state.failing_skus.contains(sku) {
            return Err(Self::server_error());
        }
        Ok(state
            .products
            .iter()
            .filter(|p| p.sku.as_deref() == Some(sku))
            .cloned()
            .collect())
    }

    async fn find_by_handle(
        &self,
        _session: &StoreSession,
        handle: &str,
    ) -> PlatformResult<Option<RemoteEntity>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("find_by_handle:{handle}"));
        Ok(state.products.iter().find(|p| p.handle == handle).cloned())
    }

    async fn create_product(
        &self,
        _session: &StoreSession,
        payload: &RemoteEntityPayload,
    ) -> PlatformResult<RemoteId> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create:{}", payload.sku));
        if state.failing_skus.contains(&payload.sku) {
            return Err(Self::server_error());
        }
        state.next_id += 1;
        let remote_id = RemoteId::new(format!("gid://memory/Product/{}", state.next_id)).unwrap();
        let mut entity = RemoteEntity {
            remote_id: remote_id.clone(),
            sku: None,
            status: String::new(),
            tags: Vec::new(),
            title: String::new(),
            handle: payload.sku.to_lowercase(),
        };
        apply_payload(&mut entity, payload);
        state.products.push(entity);
        Ok(remote_id)
    }

    async fn update_product(
        &self,
        _session: &StoreSession,
        remote_id: &RemoteId,
        payload: &RemoteEntityPayload,
    ) -> PlatformResult<RemoteId> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update:{remote_id}"));
        if state.failing_skus.contains(&payload.sku) {
            return Err(Self::server_error());
        }
        let entity = state
            .products
            .iter_mut()
            .find(|p| &p.remote_id == remote_id)
            .ok_or_else(|| PlatformError::UserErrors("Product does not exist".to_string()))?;
        apply_payload(entity, payload);
        Ok(remote_id.clone())
    }

    async fn delete_product(
        &self,
        _session: &StoreSession,
        remote_id: &RemoteId,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete:{remote_id}"));
        state.products.retain(|p| &p.remote_id != remote_id);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Fixed credentials; stores not listed have none
#[derive(Default)]
pub struct StaticCredentials {
    tokens: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn for_stores(stores: &[&str]) -> Self {
        Self {
            tokens: stores
                .iter()
                .map(|s| (s.to_string(), format!("shpat_{s}")))
                .collect(),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn credential_for(&self, store_id: &StoreId) -> Result<SecretString> {
        self.tokens
            .get(store_id.as_str())
            .map(|token| secret_string(token.clone()))
            .ok_or_else(|| {
                SyncError::Configuration(format!("No credential for store '{store_id}'"))
            })
    }
}

/// Coordinator over the given fakes, with credentials for `eu`
pub fn coordinator(
    source: Arc<MemorySource>,
    platform: Arc<MemoryPlatform>,
    options: SyncOptions,
) -> SyncCoordinator {
    SyncCoordinator::new(
        source,
        platform,
        Arc::new(StaticCredentials::for_stores(&["eu"])),
        options,
    )
}
