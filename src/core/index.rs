//! Catalog index
//!
//! Turns the three raw spreadsheet tables into typed lookups. This is the
//! only place untyped cells are interpreted; everything downstream works
//! with [`Store`], [`Product`] and [`StoreRow`].
//!
//! Store rows that cannot be turned into a [`StoreRow`] are kept in order as
//! [`RowEntry::Rejected`] so they still show up in reports. Fully blank rows
//! are dropped.

use crate::adapters::sheets::Table;
use crate::domain::{Product, ProductId, Result, Store, StoreId, StoreRow, SyncError};
use std::collections::HashMap;

/// One store-product row, either usable or rejected at the boundary
#[derive(Debug, Clone, PartialEq)]
pub enum RowEntry {
    Valid(StoreRow),
    Rejected {
        row_number: usize,
        store_id: Option<String>,
        product_id: Option<String>,
        reason: String,
    },
}

impl RowEntry {
    pub fn row_number(&self) -> usize {
        match self {
            RowEntry::Valid(row) => row.row_number,
            RowEntry::Rejected { row_number, .. } => *row_number,
        }
    }

    /// Store id as written in the sheet, if any
    pub fn store_id(&self) -> Option<&str> {
        match self {
            RowEntry::Valid(row) => Some(row.store_id.as_str()),
            RowEntry::Rejected { store_id, .. } => store_id.as_deref(),
        }
    }

    /// Product id as written in the sheet, if any
    pub fn product_id(&self) -> Option<&str> {
        match self {
            RowEntry::Valid(row) => Some(row.internal_product_id.as_str()),
            RowEntry::Rejected { product_id, .. } => product_id.as_deref(),
        }
    }
}

/// Typed view over one load of the catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    stores: HashMap<StoreId, Store>,
    products: HashMap<ProductId, Product>,
    entries: Vec<RowEntry>,
}

impl CatalogIndex {
    /// Builds the index from the stores, products and store-product tables
    ///
    /// # Errors
    ///
    /// [`SyncError::Configuration`] when a table lacks a required header.
    pub fn build(stores: &Table, products: &Table, rows: &Table) -> Result<Self> {
        require_headers(stores, &["store_id"])?;
        require_headers(products, &["internal_product_id"])?;
        require_headers(rows, &["store_id", "internal_product_id"])?;

        let index = Self {
            stores: index_stores(stores),
            products: index_products(products),
            entries: index_rows(rows),
        };

        tracing::debug!(
            stores = index.stores.len(),
            products = index.products.len(),
            rows = index.entries.len(),
            "Built catalog index"
        );
        Ok(index)
    }

    pub fn store(&self, store_id: &StoreId) -> Option<&Store> {
        self.stores.get(store_id)
    }

    pub fn product(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Store-product rows in source order
    pub fn entries(&self) -> &[RowEntry] {
        &self.entries
    }
}

fn require_headers(table: &Table, required: &[&str]) -> Result<()> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|header| !table.has_header(header))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SyncError::Configuration(format!(
            "Table '{}' is missing required column(s): {}",
            table.name,
            missing.join(", ")
        )))
    }
}

/// Case-insensitive cell access for one table
struct Columns<'t> {
    by_name: HashMap<String, &'t str>,
}

impl<'t> Columns<'t> {
    fn new(table: &'t Table) -> Self {
        let mut by_name = HashMap::new();
        for header in &table.headers {
            by_name
                .entry(header.trim().to_ascii_lowercase())
                .or_insert(header.as_str());
        }
        Self { by_name }
    }

    /// Trimmed cell value, `None` when the column is absent or the cell blank
    fn get<'r>(&self, row: &'r HashMap<String, String>, name: &str) -> Option<&'r str> {
        let header = self.by_name.get(name)?;
        row.get(*header)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    fn owned(&self, row: &HashMap<String, String>, name: &str) -> Option<String> {
        self.get(row, name).map(str::to_string)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn index_stores(table: &Table) -> HashMap<StoreId, Store> {
    let columns = Columns::new(table);
    let mut stores = HashMap::new();

    for (i, row) in table.rows.iter().enumerate() {
        let row_number = i + 1;
        let Some(store_id) = columns.get(row, "store_id").and_then(|id| StoreId::new(id).ok())
        else {
            tracing::warn!(table = %table.name, row = row_number, "Skipping store with blank store_id");
            continue;
        };

        if stores.contains_key(&store_id) {
            tracing::warn!(
                table = %table.name,
                row = row_number,
                store_id = %store_id,
                "Duplicate store_id, keeping first occurrence"
            );
            continue;
        }

        let domain = columns.owned(row, "domain").unwrap_or_default();
        if domain.is_empty() {
            tracing::warn!(store_id = %store_id, "Store has no domain");
        }

        let mut store = Store::new(store_id.clone(), domain);
        if let Some(currency) = columns.get(row, "currency") {
            store = store.with_currency(currency);
        }
        if let Some(raw) = columns.get(row, "price_multiplier") {
            match parse_number(raw) {
                Some(multiplier) => store = store.with_price_multiplier(multiplier),
                None => tracing::warn!(
                    store_id = %store_id,
                    value = %raw,
                    "Ignoring unparseable price_multiplier"
                ),
            }
        }

        stores.insert(store_id, store);
    }

    stores
}

fn index_products(table: &Table) -> HashMap<ProductId, Product> {
    let columns = Columns::new(table);
    let mut products = HashMap::new();

    for (i, row) in table.rows.iter().enumerate() {
        let row_number = i + 1;
        let Some(product_id) = columns
            .get(row, "internal_product_id")
            .and_then(|id| ProductId::new(id).ok())
        else {
            tracing::warn!(
                table = %table.name,
                row = row_number,
                "Skipping product with blank internal_product_id"
            );
            continue;
        };

        if products.contains_key(&product_id) {
            tracing::warn!(
                table = %table.name,
                row = row_number,
                product_id = %product_id,
                "Duplicate internal_product_id, keeping first occurrence"
            );
            continue;
        }

        let mut product = Product::new(product_id.clone());
        product.master_sku = columns.owned(row, "master_sku");
        product.internal_name = columns.owned(row, "internal_name");
        product.tags = columns.owned(row, "tags");
        product.description = columns.owned(row, "description");
        if let Some(raw) = columns.get(row, "base_price") {
            product.base_price = parse_number(raw);
            if product.base_price.is_none() {
                tracing::warn!(
                    product_id = %product_id,
                    value = %raw,
                    "Ignoring unparseable base_price"
                );
            }
        }

        products.insert(product_id, product);
    }

    products
}

fn index_rows(table: &Table) -> Vec<RowEntry> {
    let columns = Columns::new(table);

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.values().any(|cell| !cell.trim().is_empty()))
        .map(|(i, row)| {
            let row_number = i + 1;
            let store_id = columns.owned(row, "store_id");
            let product_id = columns.owned(row, "internal_product_id");

            let reject = |reason: String| RowEntry::Rejected {
                row_number,
                store_id: store_id.clone(),
                product_id: product_id.clone(),
                reason,
            };

            let (Some(store), Some(product)) = (
                store_id.as_deref().and_then(|id| StoreId::new(id).ok()),
                product_id.as_deref().and_then(|id| ProductId::new(id).ok()),
            ) else {
                let mut missing = Vec::new();
                if store_id.is_none() {
                    missing.push("store_id");
                }
                if product_id.is_none() {
                    missing.push("internal_product_id");
                }
                return reject(format!("missing required value(s): {}", missing.join(", ")));
            };

            let price = match columns.get(row, "price") {
                Some(raw) => match parse_number(raw) {
                    Some(price) => Some(price),
                    None => return reject(format!("invalid price '{raw}'")),
                },
                None => None,
            };

            let action = columns.owned(row, "sync_action").unwrap_or_default();
            let mut store_row = StoreRow::new(row_number, store, product, action);
            store_row.price = price;
            store_row.store_sku = columns.owned(row, "store_sku");
            store_row.title = columns.owned(row, "title");
            store_row.handle = columns.owned(row, "handle");
            store_row.tags_override = columns.owned(row, "tags_override");
            store_row.description = columns.owned(row, "description");
            store_row.status = columns.owned(row, "status");

            RowEntry::Valid(store_row)
        })
        .collect()
}
