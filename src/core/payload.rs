//! Payload builder
//!
//! Pure merge of catalog product, store and row into the outbound product.
//! Every payload carries the ownership marker exactly once.

use crate::domain::catalog::first_present;
use crate::domain::{Product, RemoteEntityPayload, Store, StoreRow, OWNERSHIP_MARKER};

/// Builds the outbound payload for a row
///
/// Field precedence, first non-blank wins:
/// - title: row title, product name, master SKU, product id
/// - price: row price, else base price times the store multiplier
/// - sku: row SKU, master SKU, product id
/// - tags: row override list, else product tags
/// - status: row status lower-cased, else `active`
pub fn build_payload(product: &Product, store: &Store, row: &StoreRow) -> RemoteEntityPayload {
    let product_id = product.internal_product_id.as_str();

    let title = first_present(&[
        row.title.as_deref(),
        product.internal_name.as_deref(),
        product.master_sku.as_deref(),
    ])
    .unwrap_or(product_id)
    .to_string();

    let price = row
        .price
        .or_else(|| {
            product
                .base_price
                .map(|base| base * store.price_multiplier)
        })
        .map(format_price);

    let tags = merge_tags(first_present(&[
        row.tags_override.as_deref(),
        product.tags.as_deref(),
    ]));

    let status = first_present(&[row.status.as_deref()])
        .map(str::to_lowercase)
        .unwrap_or_else(|| "active".to_string());

    RemoteEntityPayload {
        title,
        handle: row.handle().map(str::to_string),
        description: first_present(&[row.description.as_deref(), product.description.as_deref()])
            .map(str::to_string),
        price,
        sku: row.effective_sku(product).to_string(),
        tags,
        status,
    }
}

/// Renders a price with exactly two decimals
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

/// Splits a comma-separated tag list and appends the ownership marker once
fn merge_tags(raw: Option<&str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.unwrap_or_default().split(',').map(str::trim) {
        if tag.is_empty() || tag == OWNERSHIP_MARKER || tags.iter().any(|t| t == tag) {
            continue;
        }
        tags.push(tag.to_string());
    }
    tags.push(OWNERSHIP_MARKER.to_string());
    tags
}
