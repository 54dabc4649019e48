//! Spreadsheet source adapters
//!
//! The catalog lives in a spreadsheet with three tables (stores, products,
//! per-store rows). [`TableSource`] hides where that spreadsheet comes from;
//! the engine only sees [`Table`] values.

pub mod google;
pub mod workbook;

pub use google::GoogleSheetsSource;
pub use workbook::WorkbookFileSource;

use crate::config::{SourceConfig, SourceKind};
use crate::domain::{Result, SourceError, SyncError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// One loaded table
///
/// Each row maps header name to cell value. Rows keep source order; cells
/// missing at the end of a short row are filled with empty strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl Table {
    /// Builds a table from a grid whose first row holds the headers
    ///
    /// An empty grid yields a table with no headers and no rows.
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<String>>) -> Self {
        let mut grid = grid.into_iter();
        let headers: Vec<String> = grid
            .next()
            .map(|row| row.into_iter().map(|h| h.trim().to_string()).collect())
            .unwrap_or_default();

        let rows = grid
            .map(|cells| {
                let mut cells = cells.into_iter();
                headers
                    .iter()
                    .map(|header| (header.clone(), cells.next().unwrap_or_default()))
                    .collect()
            })
            .collect();

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Whether a header exists, ignoring case and surrounding whitespace
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|header| header.trim().eq_ignore_ascii_case(name))
    }
}

/// Source-of-truth loader
///
/// Implementations must return rows in source order and must re-read the
/// source on every call; the engine relies on fresh data per request.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Load a named table
    ///
    /// # Errors
    ///
    /// [`SourceError::TableNotFound`] when the table does not exist.
    async fn load_table(&self, name: &str) -> std::result::Result<Table, SourceError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Creates the table source selected by configuration
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn TableSource>> {
    let source: Arc<dyn TableSource> = match config.kind {
        SourceKind::Google => Arc::new(GoogleSheetsSource::new(config)?),
        SourceKind::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                SyncError::Configuration("source.path is required for file sources".to_string())
            })?;
            Arc::new(WorkbookFileSource::new(path))
        }
    };

    tracing::debug!(source = %source.describe(), "Created table source");
    Ok(source)
}
