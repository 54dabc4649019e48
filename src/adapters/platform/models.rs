//! Shopify Admin GraphQL wire models
//!
//! Only the fields shelfsync reads are modelled. Everything else in the
//! response is ignored by serde.

use crate::domain::{RemoteEntity, RemoteEntityPayload, RemoteId};
use serde::{Deserialize, Serialize};

/// Standard GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Mutation-level validation error
#[derive(Debug, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl UserError {
    /// Renders a list of user errors as `field: message; ...`
    pub fn join(errors: &[UserError]) -> String {
        errors
            .iter()
            .map(|e| match &e.field {
                Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
                _ => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Request body
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct Nodes<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
}

#[derive(Debug, Deserialize)]
pub struct VariantNode {
    pub id: String,
    pub sku: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Cursor for the following page, if there is one
    pub fn next_cursor(&self) -> Option<&str> {
        if self.page_info.has_next_page {
            self.page_info.end_cursor.as_deref()
        } else {
            None
        }
    }
}

/// `productVariants(query: "sku:...")`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsBySkuData {
    pub product_variants: Page<VariantWithProduct>,
}

#[derive(Debug, Deserialize)]
pub struct VariantWithProduct {
    pub id: String,
    pub sku: Option<String>,
    pub product: ProductNode,
}

impl VariantWithProduct {
    pub fn into_entity(self) -> Result<RemoteEntity, String> {
        Ok(RemoteEntity {
            remote_id: RemoteId::new(self.product.id)?,
            sku: self.sku,
            status: self.product.status,
            tags: self.product.tags,
            title: self.product.title,
            handle: self.product.handle,
        })
    }
}

/// `productByIdentifier(identifier: { handle })`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductByIdentifierData {
    pub product_by_identifier: Option<ProductWithVariants>,
}

#[derive(Debug, Deserialize)]
pub struct ProductWithVariants {
    #[serde(flatten)]
    pub product: ProductNode,
    pub variants: Nodes<VariantNode>,
}

impl ProductWithVariants {
    pub fn into_entity(self) -> Result<RemoteEntity, String> {
        let variant = self.variants.nodes.into_iter().next();
        Ok(RemoteEntity {
            remote_id: RemoteId::new(self.product.id)?,
            sku: variant.and_then(|v| v.sku),
            status: self.product.status,
            tags: self.product.tags,
            title: self.product.title,
            handle: self.product.handle,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateData {
    pub product_create: ProductMutationResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateData {
    pub product_update: ProductMutationResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMutationResult {
    pub product: Option<MutatedProduct>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct MutatedProduct {
    pub id: String,
    pub variants: Nodes<VariantNode>,
}

impl MutatedProduct {
    /// Id of the first variant; new products carry exactly one
    pub fn default_variant_id(&self) -> Option<&str> {
        self.variants.nodes.first().map(|v| v.id.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsBulkUpdateData {
    pub product_variants_bulk_update: UserErrorsOnly,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDeleteData {
    pub product_delete: ProductDeleteResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDeleteResult {
    pub deleted_product_id: Option<String>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserErrorsOnly {
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

/// `ProductCreateInput` / `ProductUpdateInput`
///
/// Neither carries variants; SKU and price go through
/// `productVariantsBulkUpdate` as a [`VariantInput`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    pub tags: Vec<String>,
    pub status: String,
}

/// `ProductVariantsBulkInput`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub inventory_item: InventoryItemInput,
}

#[derive(Debug, Serialize)]
pub struct InventoryItemInput {
    pub sku: String,
}

impl VariantInput {
    pub fn new(variant_id: &str, payload: &RemoteEntityPayload) -> Self {
        Self {
            id: variant_id.to_string(),
            price: payload.price.clone(),
            inventory_item: InventoryItemInput {
                sku: payload.sku.clone(),
            },
        }
    }
}

impl ProductInput {
    pub fn for_create(payload: &RemoteEntityPayload) -> Self {
        Self {
            id: None,
            title: payload.title.clone(),
            handle: payload.handle.clone(),
            description_html: payload.description.clone(),
            tags: payload.tags.clone(),
            status: payload.status.to_uppercase(),
        }
    }

    pub fn for_update(remote_id: &RemoteId, payload: &RemoteEntityPayload) -> Self {
        Self {
            id: Some(remote_id.as_str().to_string()),
            ..Self::for_create(payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> RemoteEntityPayload {
        RemoteEntityPayload {
            title: "Tee".to_string(),
            handle: Some("tee".to_string()),
            description: None,
            price: Some("19.90".to_string()),
            sku: "TEE-01".to_string(),
            tags: vec!["summer".to_string(), "shelfsync:managed".to_string()],
            status: "active".to_string(),
        }
    }

    #[test]
    fn test_create_input_has_no_variants() {
        let json = serde_json::to_value(ProductInput::for_create(&payload())).unwrap();

        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["handle"], "tee");
        assert!(json.get("variants").is_none());
        assert!(json.get("id").is_none());
        assert!(json.get("descriptionHtml").is_none());
    }

    #[test]
    fn test_update_input_has_id() {
        let id = RemoteId::new("gid://shopify/Product/7").unwrap();
        let json = serde_json::to_value(ProductInput::for_update(&id, &payload())).unwrap();

        assert_eq!(json["id"], "gid://shopify/Product/7");
        assert_eq!(json["title"], "Tee");
    }

    #[test]
    fn test_variant_input_puts_sku_on_inventory_item() {
        let json = serde_json::to_value(VariantInput::new(
            "gid://shopify/ProductVariant/90",
            &payload(),
        ))
        .unwrap();

        assert_eq!(json["id"], "gid://shopify/ProductVariant/90");
        assert_eq!(json["price"], "19.90");
        assert_eq!(json["inventoryItem"]["sku"], "TEE-01");
        assert!(json.get("sku").is_none());
    }

    #[test]
    fn test_page_cursor() {
        let page: Page<VariantNode> = serde_json::from_value(serde_json::json!({
            "nodes": [],
            "pageInfo": {"hasNextPage": true, "endCursor": "abc"}
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), Some("abc"));

        let last: Page<VariantNode> = serde_json::from_value(serde_json::json!({
            "nodes": [],
            "pageInfo": {"hasNextPage": false, "endCursor": "abc"}
        }))
        .unwrap();
        assert_eq!(last.next_cursor(), None);
    }

    #[test]
    fn test_user_error_join() {
        let errors = vec![
            UserError {
                field: Some(vec!["input".to_string(), "handle".to_string()]),
                message: "Handle has already been taken".to_string(),
            },
            UserError {
                field: None,
                message: "Something else".to_string(),
            },
        ];
        assert_eq!(
            UserError::join(&errors),
            "input.handle: Handle has already been taken; Something else"
        );
    }

    #[test]
    fn test_product_by_handle_into_entity() {
        let data: ProductByIdentifierData = serde_json::from_value(serde_json::json!({
            "productByIdentifier": {
                "id": "gid://shopify/Product/3",
                "status": "ACTIVE",
                "tags": ["shelfsync:managed"],
                "title": "Tee",
                "handle": "tee",
                "variants": {"nodes": [{"id": "gid://shopify/ProductVariant/9", "sku": "TEE-01"}]}
            }
        }))
        .unwrap();

        let entity = data.product_by_identifier.unwrap().into_entity().unwrap();
        assert_eq!(entity.remote_id.as_str(), "gid://shopify/Product/3");
        assert_eq!(entity.sku.as_deref(), Some("TEE-01"));
        assert!(entity.is_owned());
    }
}
