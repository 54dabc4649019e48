//! Catalog domain model
//!
//! Stores, products and per-store rows as loaded from the spreadsheet. All
//! three are read-only to the engine and are rebuilt from the source on every
//! request.
//!
//! Optional text fields never hold blank strings once they come through the
//! catalog index, but values built by hand may, so every accessor that picks
//! between candidates treats blank as absent.

use super::action::SyncAction;
use super::ids::{ProductId, StoreId};
use serde::{Deserialize, Serialize};

/// A remote commerce store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Unique key
    pub store_id: StoreId,

    /// Store domain, e.g. `acme-eu.myshopify.com`
    pub domain: String,

    /// Store currency (informational)
    pub currency: Option<String>,

    /// Multiplier applied to the catalog base price
    pub price_multiplier: f64,
}

impl Store {
    /// Creates a store with a price multiplier of 1
    pub fn new(store_id: StoreId, domain: impl Into<String>) -> Self {
        Self {
            store_id,
            domain: domain.into(),
            currency: None,
            price_multiplier: 1.0,
        }
    }

    /// Sets the currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the price multiplier
    pub fn with_price_multiplier(mut self, multiplier: f64) -> Self {
        self.price_multiplier = multiplier;
        self
    }
}

/// A catalog master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique key
    pub internal_product_id: ProductId,
    pub master_sku: Option<String>,
    pub internal_name: Option<String>,
    pub base_price: Option<f64>,
    /// Comma-separated tag list
    pub tags: Option<String>,
    pub description: Option<String>,
}

impl Product {
    /// Creates a product with only its key set
    pub fn new(internal_product_id: ProductId) -> Self {
        Self {
            internal_product_id,
            master_sku: None,
            internal_name: None,
            base_price: None,
            tags: None,
            description: None,
        }
    }

    pub fn with_master_sku(mut self, sku: impl Into<String>) -> Self {
        self.master_sku = Some(sku.into());
        self
    }

    pub fn with_internal_name(mut self, name: impl Into<String>) -> Self {
        self.internal_name = Some(name.into());
        self
    }

    pub fn with_base_price(mut self, price: f64) -> Self {
        self.base_price = Some(price);
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A per-store override and intent record
///
/// Keyed by `(store_id, internal_product_id)`. One row yields at most one
/// apply attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRow {
    /// 1-based position in the source table, header excluded
    pub row_number: usize,
    pub store_id: StoreId,
    pub internal_product_id: ProductId,
    /// Declared action exactly as written in the sheet
    pub sync_action: String,
    pub store_sku: Option<String>,
    pub title: Option<String>,
    pub handle: Option<String>,
    pub price: Option<f64>,
    /// Comma-separated tags replacing the catalog tags for this store
    pub tags_override: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl StoreRow {
    /// Creates a row with no overrides
    pub fn new(
        row_number: usize,
        store_id: StoreId,
        internal_product_id: ProductId,
        sync_action: impl Into<String>,
    ) -> Self {
        Self {
            row_number,
            store_id,
            internal_product_id,
            sync_action: sync_action.into(),
            store_sku: None,
            title: None,
            handle: None,
            price: None,
            tags_override: None,
            description: None,
            status: None,
        }
    }

    pub fn with_store_sku(mut self, sku: impl Into<String>) -> Self {
        self.store_sku = Some(sku.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_tags_override(mut self, tags: impl Into<String>) -> Self {
        self.tags_override = Some(tags.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// The declared action, if it is one the engine understands
    pub fn declared_action(&self) -> Option<SyncAction> {
        SyncAction::parse(&self.sync_action)
    }

    /// Whether the sheet declares any action at all for this row
    pub fn has_declared_action(&self) -> bool {
        !self.sync_action.trim().is_empty()
    }

    /// SKU used to match this row remotely
    ///
    /// First non-blank of the store SKU, the catalog master SKU and the
    /// catalog product id.
    pub fn effective_sku<'a>(&'a self, product: &'a Product) -> &'a str {
        first_present(&[
            self.store_sku.as_deref(),
            product.master_sku.as_deref(),
        ])
        .unwrap_or_else(|| product.internal_product_id.as_str())
    }

    /// Handle override, if any
    pub fn handle(&self) -> Option<&str> {
        first_present(&[self.handle.as_deref()])
    }
}

/// Returns the first candidate that is present and not blank, trimmed
pub fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .map(str::trim)
        .find(|value| !value.is_empty())
}
