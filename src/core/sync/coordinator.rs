//! Sync coordinator - entry point for preview and sync requests
//!
//! Every request reloads the catalog and re-queries the store; nothing is
//! kept between calls. Only configuration and source failures abort a
//! request. Everything that goes wrong for a single row is reported on that
//! row and the batch carries on.

use super::report::{ApplyResult, PreviewEntry, SyncFilter, SyncReport};
use crate::adapters::credentials::CredentialProvider;
use crate::adapters::platform::{CommercePlatform, StoreSession};
use crate::adapters::sheets::{Table, TableSource};
use crate::config::ShelfsyncConfig;
use crate::core::apply::ApplyExecutor;
use crate::core::classify::{classify, REASON_INVALID_ACTION};
use crate::core::index::{CatalogIndex, RowEntry};
use crate::core::resolver::RemoteResolver;
use crate::domain::{PlannedAction, Product, Result, SourceError, StoreId, StoreRow, SyncError};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Coordinator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub stores_table: String,
    pub products_table: String,
    pub rows_table: String,
    /// Rows in flight at once; 1 is strictly sequential
    pub max_concurrency: usize,
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn from_config(config: &ShelfsyncConfig) -> Self {
        Self {
            stores_table: config.source.stores_table.clone(),
            products_table: config.source.products_table.clone(),
            rows_table: config.source.rows_table.clone(),
            max_concurrency: config.sync.max_concurrency,
            dry_run: config.application.dry_run,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            stores_table: "Stores".to_string(),
            products_table: "Products".to_string(),
            rows_table: "StoreProducts".to_string(),
            max_concurrency: 1,
            dry_run: false,
        }
    }
}

/// Sync coordinator
pub struct SyncCoordinator {
    source: Arc<dyn TableSource>,
    credentials: Arc<dyn CredentialProvider>,
    resolver: RemoteResolver,
    executor: ApplyExecutor,
    options: SyncOptions,
}

impl SyncCoordinator {
    /// Create a new sync coordinator
    pub fn new(
        source: Arc<dyn TableSource>,
        platform: Arc<dyn CommercePlatform>,
        credentials: Arc<dyn CredentialProvider>,
        options: SyncOptions,
    ) -> Self {
        Self {
            source,
            credentials,
            resolver: RemoteResolver::new(platform.clone()),
            executor: ApplyExecutor::new(platform).with_dry_run(options.dry_run),
            options,
        }
    }

    /// Classify one store's rows without changing anything
    ///
    /// Covers rows of `store_id` whose declared action is create, update or
    /// delete. Lookup and mapping failures are reported on the entry.
    ///
    /// # Errors
    ///
    /// Configuration or source errors, including a missing store credential.
    pub async fn preview(&self, store_id: &StoreId) -> Result<Vec<PreviewEntry>> {
        tracing::info!(store_id = %store_id, source = %self.source.describe(), "Starting preview");

        let index = self.load_catalog().await?;
        let rows: Vec<&StoreRow> = index
            .entries()
            .iter()
            .filter_map(|entry| match entry {
                RowEntry::Valid(row) if &row.store_id == store_id => Some(row),
                _ => None,
            })
            .filter(|row| row.declared_action().is_some())
            .collect();

        let sessions = self.open_sessions(&index, rows.iter().copied())?;

        let entries = stream::iter(rows)
            .map(|row| self.preview_row(&index, &sessions, row))
            .buffered(self.concurrency())
            .collect::<Vec<_>>()
            .await;

        tracing::info!(
            store_id = %store_id,
            rows = entries.len(),
            errors = entries.iter().filter(|e| e.error.is_some()).count(),
            "Preview completed"
        );
        Ok(entries)
    }

    /// Classify and apply every row passing the filter
    ///
    /// Eligible rows are those passing `filter` with a non-blank declared
    /// action, plus rows rejected by the catalog index. Results come back in
    /// source order, one per eligible row.
    ///
    /// # Errors
    ///
    /// Configuration or source errors, including a missing store credential.
    /// No row is touched when this fails.
    pub async fn sync(&self, filter: &SyncFilter) -> Result<SyncReport> {
        let start_time = Instant::now();
        let report = SyncReport::new(self.options.dry_run);

        tracing::info!(
            store_id = ?filter.store_id.as_ref().map(StoreId::as_str),
            product_id = ?filter.internal_product_id.as_ref().map(|id| id.as_str()),
            dry_run = self.options.dry_run,
            source = %self.source.describe(),
            "Starting sync"
        );

        let index = self.load_catalog().await?;
        let entries: Vec<&RowEntry> = index
            .entries()
            .iter()
            .filter(|entry| filter.matches(entry))
            .filter(|entry| match entry {
                RowEntry::Valid(row) => row.has_declared_action(),
                RowEntry::Rejected { .. } => true,
            })
            .collect();

        if entries.is_empty() {
            tracing::info!("No eligible rows");
            let report = report.with_duration(start_time.elapsed());
            report.log_summary();
            return Ok(report);
        }

        let sessions = self.open_sessions(
            &index,
            entries.iter().filter_map(|entry| match entry {
                RowEntry::Valid(row) if row.declared_action().is_some() => Some(row),
                _ => None,
            }),
        )?;

        let results = stream::iter(entries)
            .map(|entry| self.sync_entry(&index, &sessions, entry))
            .buffered(self.concurrency())
            .collect::<Vec<_>>()
            .await;

        let report = report
            .with_results(results)
            .with_duration(start_time.elapsed());
        report.log_summary();
        Ok(report)
    }

    fn concurrency(&self) -> usize {
        self.options.max_concurrency.max(1)
    }

    /// Loads the three tables fresh and indexes them
    async fn load_catalog(&self) -> Result<CatalogIndex> {
        let (stores, products, rows) = tokio::try_join!(
            self.load_table(&self.options.stores_table),
            self.load_table(&self.options.products_table),
            self.load_table(&self.options.rows_table),
        )?;

        CatalogIndex::build(&stores, &products, &rows)
    }

    async fn load_table(&self, name: &str) -> Result<Table> {
        self.source.load_table(name).await.map_err(|e| match e {
            SourceError::TableNotFound(table) => {
                SyncError::Configuration(format!("Source table '{table}' not found"))
            }
            other => SyncError::Source(other),
        })
    }

    /// Resolves a session for every catalog store the rows touch
    ///
    /// Rows whose store is not in the catalog are skipped here and reported
    /// as mapping errors later.
    fn open_sessions<'a>(
        &self,
        index: &CatalogIndex,
        rows: impl Iterator<Item = &'a StoreRow>,
    ) -> Result<HashMap<StoreId, StoreSession>> {
        let mut sessions = HashMap::new();
        for row in rows {
            if sessions.contains_key(&row.store_id) {
                continue;
            }
            let Some(store) = index.store(&row.store_id) else {
                continue;
            };
            let credential = self.credentials.credential_for(&row.store_id)?;
            sessions.insert(
                row.store_id.clone(),
                StoreSession::new(store.clone(), credential),
            );
        }
        Ok(sessions)
    }

    /// Store session and product for a row, or the mapping error
    fn map_row<'i>(
        &self,
        index: &'i CatalogIndex,
        sessions: &'i HashMap<StoreId, StoreSession>,
        row: &StoreRow,
    ) -> Result<(&'i StoreSession, &'i Product)> {
        if index.store(&row.store_id).is_none() {
            return Err(SyncError::Mapping(format!(
                "store '{}' is not in the store table",
                row.store_id
            )));
        }
        let product = index.product(&row.internal_product_id).ok_or_else(|| {
            SyncError::Mapping(format!(
                "product '{}' is not in the catalog",
                row.internal_product_id
            ))
        })?;
        let session = sessions.get(&row.store_id).ok_or_else(|| {
            SyncError::Other(format!("no session opened for store '{}'", row.store_id))
        })?;
        Ok((session, product))
    }

    async fn preview_row(
        &self,
        index: &CatalogIndex,
        sessions: &HashMap<StoreId, StoreSession>,
        row: &StoreRow,
    ) -> PreviewEntry {
        let entry = PreviewEntry::for_row(row);

        let (session, product) = match self.map_row(index, sessions, row) {
            Ok(mapped) => mapped,
            Err(e) => return entry.failed(e),
        };

        let entry = entry.with_sku(row.effective_sku(product));
        match classify(&self.resolver, session, product, row).await {
            Ok(classification) => entry.classified(classification),
            Err(e) => entry.failed(SyncError::from(e)),
        }
    }

    async fn sync_entry(
        &self,
        index: &CatalogIndex,
        sessions: &HashMap<StoreId, StoreSession>,
        entry: &RowEntry,
    ) -> ApplyResult {
        let row = match entry {
            RowEntry::Valid(row) => row,
            RowEntry::Rejected { reason, .. } => {
                tracing::warn!(row = entry.row_number(), reason = %reason, "Rejected row");
                return ApplyResult::for_entry(entry)
                    .failed(SyncError::Validation(format!("invalid row: {reason}")));
            }
        };

        // Unknown actions are skipped before any mapping or remote work.
        if row.declared_action().is_none() {
            return ApplyResult::for_row(row)
                .with_action(PlannedAction::Skip)
                .skipped(REASON_INVALID_ACTION);
        }

        let (session, product) = match self.map_row(index, sessions, row) {
            Ok(mapped) => mapped,
            Err(e) => {
                tracing::warn!(
                    row = row.row_number,
                    store_id = %row.store_id,
                    product_id = %row.internal_product_id,
                    error = %e,
                    "Row mapping failed"
                );
                return ApplyResult::for_row(row).failed(e);
            }
        };

        let classification = match classify(&self.resolver, session, product, row).await {
            Ok(classification) => classification,
            Err(e) => {
                tracing::warn!(
                    row = row.row_number,
                    store_id = %row.store_id,
                    product_id = %row.internal_product_id,
                    error = %e,
                    "Row lookup failed"
                );
                return ApplyResult::for_row(row).failed(SyncError::from(e));
            }
        };

        self.executor
            .apply(session, &classification, product, row)
            .await
    }
}
