//! Sync and preview reporting
//!
//! This module defines the per-row outcomes and the batch report returned by
//! [`super::SyncCoordinator`]. All types serialize to JSON for `--json`
//! output.

use crate::core::index::RowEntry;
use crate::domain::{Classification, PlannedAction, ProductId, RemoteId, StoreId, StoreRow};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Outcome status of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyStatus {
    Success,
    Skipped,
    Error,
}

impl fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyStatus::Success => write!(f, "success"),
            ApplyStatus::Skipped => write!(f, "skipped"),
            ApplyStatus::Error => write!(f, "error"),
        }
    }
}

/// Result of applying one row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyResult {
    pub row_number: usize,
    pub store_id: Option<String>,
    pub internal_product_id: Option<String>,
    /// Action actually carried out; absent when the row never got that far
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<PlannedAction>,
    pub status: ApplyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<RemoteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplyResult {
    /// A successful result with no action yet
    pub fn new(
        row_number: usize,
        store_id: Option<String>,
        internal_product_id: Option<String>,
    ) -> Self {
        Self {
            row_number,
            store_id,
            internal_product_id,
            action: None,
            status: ApplyStatus::Success,
            remote_id: None,
            note: None,
            error: None,
        }
    }

    pub fn for_row(row: &StoreRow) -> Self {
        Self::new(
            row.row_number,
            Some(row.store_id.to_string()),
            Some(row.internal_product_id.to_string()),
        )
    }

    pub fn for_entry(entry: &RowEntry) -> Self {
        Self::new(
            entry.row_number(),
            entry.store_id().map(str::to_string),
            entry.product_id().map(str::to_string),
        )
    }

    pub fn with_action(mut self, action: PlannedAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_remote_id(mut self, remote_id: RemoteId) -> Self {
        self.remote_id = Some(remote_id);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Marks the row skipped with a note
    pub fn skipped(mut self, note: impl Into<String>) -> Self {
        self.status = ApplyStatus::Skipped;
        self.note = Some(note.into());
        self
    }

    /// Marks the row failed
    pub fn failed(mut self, error: impl fmt::Display) -> Self {
        self.status = ApplyStatus::Error;
        self.error = Some(error.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == ApplyStatus::Error
    }
}

/// One row of a preview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewEntry {
    pub row_number: usize,
    pub store_id: Option<String>,
    pub internal_product_id: Option<String>,
    /// SKU used for matching, when the product is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PreviewEntry {
    pub fn for_row(row: &StoreRow) -> Self {
        Self {
            row_number: row.row_number,
            store_id: Some(row.store_id.to_string()),
            internal_product_id: Some(row.internal_product_id.to_string()),
            sku: None,
            classification: None,
            error: None,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn classified(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    pub fn failed(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Narrows the rows a sync touches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncFilter {
    pub store_id: Option<StoreId>,
    pub internal_product_id: Option<ProductId>,
}

impl SyncFilter {
    /// Matches every row
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, store_id: StoreId) -> Self {
        self.store_id = Some(store_id);
        self
    }

    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.internal_product_id = Some(product_id);
        self
    }

    /// Whether a row passes the filter
    ///
    /// A row without a store id only passes when no store is filtered on;
    /// likewise for the product id.
    pub fn matches(&self, entry: &RowEntry) -> bool {
        let store_ok = match &self.store_id {
            Some(wanted) => entry.store_id() == Some(wanted.as_str()),
            None => true,
        };
        let product_ok = match &self.internal_product_id {
            Some(wanted) => entry.product_id() == Some(wanted.as_str()),
            None => true,
        };
        store_ok && product_ok
    }
}

/// Result of one sync request
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Number of eligible rows; always equals `results.len()`
    pub processed: usize,
    pub results: Vec<ApplyResult>,
    pub started_at: DateTime<Utc>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    pub dry_run: bool,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl SyncReport {
    /// Create an empty report starting now
    pub fn new(dry_run: bool) -> Self {
        Self {
            processed: 0,
            results: Vec::new(),
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            dry_run,
        }
    }

    /// Set the results, keeping `processed` in step
    pub fn with_results(mut self, results: Vec<ApplyResult>) -> Self {
        self.processed = results.len();
        self.results = results;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    fn count(&self, status: ApplyStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(ApplyStatus::Success)
    }

    pub fn skipped(&self) -> usize {
        self.count(ApplyStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(ApplyStatus::Error)
    }

    /// Check if no row failed
    pub fn is_successful(&self) -> bool {
        self.failed() == 0
    }

    /// Get success rate as a percentage of rows that did not fail
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            return 100.0;
        }
        ((self.processed - self.failed()) as f64 / self.processed as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            processed = self.processed,
            succeeded = self.succeeded(),
            skipped = self.skipped(),
            failed = self.failed(),
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Sync completed"
        );

        for result in self.results.iter().filter(|r| r.is_error()) {
            tracing::warn!(
                row = result.row_number,
                store_id = result.store_id.as_deref().unwrap_or("-"),
                product_id = result.internal_product_id.as_deref().unwrap_or("-"),
                error = result.error.as_deref().unwrap_or_default(),
                "Row failed"
            );
        }
    }
}
