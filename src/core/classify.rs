//! Action classifier
//!
//! Decides what a row should do against the live store. Remote state wins
//! over declared intent for create and update; delete is never overridden.

use super::resolver::RemoteResolver;
use crate::adapters::platform::StoreSession;
use crate::domain::{Classification, LookupError, PlannedAction, Product, StoreRow, SyncAction};

pub const REASON_INVALID_ACTION: &str = "invalid declared action";
pub const REASON_EXPLICIT_DELETE: &str = "explicit delete";
pub const REASON_OWNED_MATCH: &str = "existing match by sku+marker";
pub const REASON_NO_MATCH: &str = "no existing owned match";

/// Classifies one row
///
/// Makes at most one remote read (the SKU+marker lookup) and none for
/// invalid or delete rows.
///
/// # Errors
///
/// Propagates the resolver's [`LookupError`]; the caller records it on the row.
pub async fn classify(
    resolver: &RemoteResolver,
    session: &StoreSession,
    product: &Product,
    row: &StoreRow,
) -> Result<Classification, LookupError> {
    let declared = match row.declared_action() {
        None => {
            return Ok(Classification::new(
                PlannedAction::Skip,
                REASON_INVALID_ACTION,
            ))
        }
        Some(SyncAction::Delete) => {
            return Ok(Classification::new(
                PlannedAction::Delete,
                REASON_EXPLICIT_DELETE,
            ))
        }
        Some(action) => action,
    };

    let sku = row.effective_sku(product);
    let classification = match resolver.resolve_by_sku_and_marker(session, sku).await? {
        Some(entity) => Classification::matched(entity.remote_id, REASON_OWNED_MATCH),
        None => Classification::new(PlannedAction::Create, REASON_NO_MATCH),
    };

    if PlannedAction::from(declared) != classification.planned_action {
        tracing::debug!(
            store_id = %row.store_id,
            product_id = %row.internal_product_id,
            declared = %declared,
            planned = %classification.planned_action,
            "Declared action overridden by remote state"
        );
    }

    Ok(classification)
}
