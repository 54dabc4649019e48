//! Apply executor
//!
//! Carries out one classified row against the store. Errors never escape a
//! row: every failure ends up on that row's [`ApplyResult`].

use super::payload::build_payload;
use super::resolver::RemoteResolver;
use super::sync::report::ApplyResult;
use crate::adapters::platform::{CommercePlatform, StoreSession};
use crate::domain::{
    Classification, PlannedAction, Product, RemoteId, StoreRow, SyncAction, SyncError,
};
use std::sync::Arc;

pub const NOTE_HANDLE_FALLBACK: &str = "matched by handle fallback";
pub const NOTE_CREATE_FALLBACK: &str = "update fallback: no existing remote product, created";
pub const NOTE_NOTHING_TO_DELETE: &str = "nothing to delete";

/// Executes classified rows
#[derive(Clone)]
pub struct ApplyExecutor {
    resolver: RemoteResolver,
    platform: Arc<dyn CommercePlatform>,
    dry_run: bool,
}

impl ApplyExecutor {
    pub fn new(platform: Arc<dyn CommercePlatform>) -> Self {
        Self {
            resolver: RemoteResolver::new(platform.clone()),
            platform,
            dry_run: false,
        }
    }

    /// Resolve targets but send no mutation
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Applies one row
    ///
    /// A row declaring `update` that the classifier sent to create still
    /// goes through the update fallback chain: handle lookup first, then
    /// create with a note.
    pub async fn apply(
        &self,
        session: &StoreSession,
        classification: &Classification,
        product: &Product,
        row: &StoreRow,
    ) -> ApplyResult {
        let planned = effective_action(classification, row);
        let base = ApplyResult::for_row(row).with_action(planned);

        let outcome = match planned {
            PlannedAction::Skip => return base.skipped(classification.reason.clone()),
            PlannedAction::Create => self.create(session, product, row, base).await,
            PlannedAction::Update => {
                self.update(session, classification, product, row, base)
                    .await
            }
            PlannedAction::Delete => {
                self.delete(session, classification, product, row, base)
                    .await
            }
        };

        match outcome {
            Ok(result) => {
                tracing::debug!(
                    store_id = %row.store_id,
                    product_id = %row.internal_product_id,
                    action = ?result.action,
                    remote_id = ?result.remote_id,
                    note = ?result.note,
                    "Row applied"
                );
                result
            }
            Err(e) => {
                tracing::warn!(
                    store_id = %row.store_id,
                    product_id = %row.internal_product_id,
                    action = %planned,
                    error = %e,
                    "Row apply failed"
                );
                ApplyResult::for_row(row).with_action(planned).failed(e)
            }
        }
    }

    async fn create(
        &self,
        session: &StoreSession,
        product: &Product,
        row: &StoreRow,
        result: ApplyResult,
    ) -> Result<ApplyResult, SyncError> {
        let result = result.with_action(PlannedAction::Create);
        if self.dry_run {
            return Ok(result.with_note(dry_run_note(PlannedAction::Create)));
        }

        let payload = build_payload(product, session.store(), row);
        let remote_id = self
            .platform
            .create_product(session, &payload)
            .await
            .map_err(|e| SyncError::Apply(format!("create failed: {e}")))?;
        Ok(result.with_remote_id(remote_id))
    }

    async fn update(
        &self,
        session: &StoreSession,
        classification: &Classification,
        product: &Product,
        row: &StoreRow,
        result: ApplyResult,
    ) -> Result<ApplyResult, SyncError> {
        let (target, note) = match &classification.matched_remote_id {
            Some(remote_id) => (remote_id.clone(), None),
            None => match self.resolve_handle(session, row).await? {
                Some(remote_id) => (remote_id, Some(NOTE_HANDLE_FALLBACK)),
                None => {
                    let created = self.create(session, product, row, result).await?;
                    return Ok(match created.note {
                        // Dry run already explains itself.
                        Some(_) => created,
                        None => created.with_note(NOTE_CREATE_FALLBACK),
                    });
                }
            },
        };

        let mut result = result.with_remote_id(target.clone());
        if let Some(note) = note {
            result = result.with_note(note);
        }
        if self.dry_run {
            return Ok(result.with_note(dry_run_note(PlannedAction::Update)));
        }

        let payload = build_payload(product, session.store(), row);
        let remote_id = self
            .platform
            .update_product(session, &target, &payload)
            .await
            .map_err(|e| SyncError::Apply(format!("update of {target} failed: {e}")))?;
        Ok(result.with_remote_id(remote_id))
    }

    async fn delete(
        &self,
        session: &StoreSession,
        classification: &Classification,
        product: &Product,
        row: &StoreRow,
        result: ApplyResult,
    ) -> Result<ApplyResult, SyncError> {
        let target = match &classification.matched_remote_id {
            Some(remote_id) => Some(remote_id.clone()),
            None => match self
                .resolver
                .resolve_by_sku_and_marker(session, row.effective_sku(product))
                .await?
            {
                Some(entity) => Some(entity.remote_id),
                None => self.resolve_handle(session, row).await?,
            },
        };

        let Some(target) = target else {
            return Ok(result.with_note(NOTE_NOTHING_TO_DELETE));
        };

        let result = result.with_remote_id(target.clone());
        if self.dry_run {
            return Ok(result.with_note(dry_run_note(PlannedAction::Delete)));
        }

        self.platform
            .delete_product(session, &target)
            .await
            .map_err(|e| SyncError::Apply(format!("delete of {target} failed: {e}")))?;
        Ok(result)
    }

    async fn resolve_handle(
        &self,
        session: &StoreSession,
        row: &StoreRow,
    ) -> Result<Option<RemoteId>, SyncError> {
        let Some(handle) = row.handle() else {
            return Ok(None);
        };
        Ok(self
            .resolver
            .resolve_by_handle(session, handle)
            .await?
            .map(|entity| entity.remote_id))
    }
}

/// Action the executor carries out for a classified row
fn effective_action(classification: &Classification, row: &StoreRow) -> PlannedAction {
    match classification.planned_action {
        PlannedAction::Create
            if classification.matched_remote_id.is_none()
                && row.declared_action() == Some(SyncAction::Update) =>
        {
            PlannedAction::Update
        }
        planned => planned,
    }
}

fn dry_run_note(action: PlannedAction) -> String {
    format!("dry run: {action} not sent")
}
