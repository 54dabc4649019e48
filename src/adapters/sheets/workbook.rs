//! Local JSON workbook source
//!
//! A workbook file is a JSON object mapping table name to a grid of cells,
//! first row being the header:
//!
//! ```json
//! {
//!   "Stores": [["store_id", "domain"], ["eu", "eu-shop.myshopify.com"]],
//!   "Products": [["internal_product_id", "master_sku"], ["P-1", "TEE-01"]]
//! }
//! ```
//!
//! The file is re-read on every load so edits show up on the next request.

use super::google::cell_to_string;
use super::{Table, TableSource};
use crate::domain::SourceError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct WorkbookFileSource {
    path: PathBuf,
}

impl WorkbookFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TableSource for WorkbookFileSource {
    async fn load_table(&self, name: &str) -> Result<Table, SourceError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("{}: {e}", self.path.display())))?;

        let mut workbook: HashMap<String, Vec<Vec<serde_json::Value>>> =
            serde_json::from_str(&contents)
                .map_err(|e| SourceError::InvalidFormat(format!("{}: {e}", self.path.display())))?;

        let grid = workbook
            .remove(name)
            .ok_or_else(|| SourceError::TableNotFound(name.to_string()))?;

        let grid = grid
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();

        Ok(Table::from_grid(name, grid))
    }

    fn describe(&self) -> String {
        format!("workbook:{}", self.path.display())
    }
}
