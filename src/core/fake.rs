//! In-memory platform for unit tests

use crate::adapters::platform::{CommercePlatform, PlatformResult, StoreSession};
use crate::config::secret_string;
use crate::domain::{
    PlatformError, RemoteEntity, RemoteEntityPayload, RemoteId, Store, StoreId, OWNERSHIP_MARKER,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    products: Vec<RemoteEntity>,
    calls: Vec<String>,
    next_id: u32,
    failing_skus: HashSet<String>,
}

#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<State>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(self, id: &str, sku: &str, handle: &str, status: &str, owned: bool) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let tags = if owned {
                vec![OWNERSHIP_MARKER.to_string()]
            } else {
                Vec::new()
            };
            state.products.push(RemoteEntity {
                remote_id: RemoteId::new(id).unwrap(),
                sku: Some(sku.to_string()),
                status: status.to_string(),
                tags,
                title: sku.to_string(),
                handle: handle.to_string(),
            });
        }
        self
    }

    pub fn failing_sku(self, sku: &str) -> Self {
        self.state.lock().unwrap().failing_skus.insert(sku.to_string());
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
}

pub fn session() -> StoreSession {
    StoreSession::new(
        Store::new(StoreId::new("eu").unwrap(), "eu.myshopify.com"),
        secret_string("shpat_test".to_string()),
    )
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
impl CommercePlatform for FakePlatform {
    async fn find_by_sku(
        &self,
        _session: &StoreSession,
        sku: &str,
    ) -> PlatformResult<Vec<RemoteEntity>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("find_by_sku:{sku}"));
        if state.failing_skus.contains(sku) {
            return Err(PlatformError::ConnectionFailed("connection reset".to_string()));
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
            return Err(PlatformError::ServerError {
                status: 500,
                message: "boom".to_string(),
            });
        }
        state.next_id += 1;
        let remote_id = RemoteId::new(format!("gid://fake/Product/{}", state.next_id)).unwrap();
        let mut entity = RemoteEntity {
            remote_id: remote_id.clone(),
            sku: None,
            status: String::new(),
            tags: Vec::new(),
            title: String::new(),
            handle: payload.title.to_lowercase().replace(' ', "-"),
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
        "fake"
    }
}
