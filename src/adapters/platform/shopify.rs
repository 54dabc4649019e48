//! Shopify Admin GraphQL platform
//!
//! All calls go to `POST https://{store domain}/admin/api/{version}/graphql.json`
//! with the store's token in `X-Shopify-Access-Token`. A product is modelled
//! with a single variant carrying the SKU and price. Product fields and
//! variant fields are written by separate mutations.

use super::models::{
    GraphQlRequest, GraphQlResponse, MutatedProduct, ProductByIdentifierData, ProductCreateData,
    ProductDeleteData, ProductInput, ProductUpdateData, UserError, VariantInput,
    VariantsBulkUpdateData, VariantsBySkuData,
};
use super::{CommercePlatform, PlatformResult, StoreSession};
use crate::config::PlatformConfig;
use crate::domain::{PlatformError, RemoteEntity, RemoteEntityPayload, RemoteId, Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const PRODUCT_FIELDS: &str = "id status tags title handle";
const VARIANT_PAGE_SIZE: usize = 50;

/// Shopify Admin API client
pub struct ShopifyPlatform {
    client: Client,
    api_version: String,
    base_url_override: Option<String>,
}

impl ShopifyPlatform {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Configuration error when the HTTP client cannot be built.
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_version: config.api_version.clone(),
            base_url_override: config
                .base_url_override
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    /// GraphQL endpoint for a store
    fn endpoint(&self, session: &StoreSession) -> String {
        let base = match &self.base_url_override {
            Some(base) => base.clone(),
            None => {
                let domain = session.store().domain.trim();
                let domain = domain
                    .strip_prefix("https://")
                    .or_else(|| domain.strip_prefix("http://"))
                    .unwrap_or(domain)
                    .trim_end_matches('/');
                format!("https://{domain}")
            }
        };
        format!("{base}/admin/api/{}/graphql.json", self.api_version)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        session: &StoreSession,
        query: &str,
        variables: serde_json::Value,
    ) -> PlatformResult<T> {
        let response = self
            .client
            .post(self.endpoint(session))
            .header("X-Shopify-Access-Token", session.access_token())
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlatformError::Timeout(e.to_string())
                } else {
                    PlatformError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))?;

        if !body.errors.is_empty() {
            let messages: Vec<_> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(PlatformError::GraphQl(messages.join("; ")));
        }

        body.data
            .ok_or_else(|| PlatformError::InvalidResponse("response has no data".to_string()))
    }

    /// Writes SKU and price onto the product's default variant
    async fn write_variant(
        &self,
        session: &StoreSession,
        product: &MutatedProduct,
        payload: &RemoteEntityPayload,
    ) -> PlatformResult<()> {
        let Some(variant_id) = product.default_variant_id() else {
            tracing::warn!(
                store_id = %session.store().store_id,
                remote_id = %product.id,
                "Product has no variant; sku and price not written"
            );
            return Ok(());
        };

        let query = "mutation($productId: ID!, $variants: [ProductVariantsBulkInput!]!) \
                     { productVariantsBulkUpdate(productId: $productId, variants: $variants) \
                     { userErrors { field message } } }";
        let data: VariantsBulkUpdateData = self
            .execute(
                session,
                query,
                serde_json::json!({
                    "productId": product.id.as_str(),
                    "variants": [VariantInput::new(variant_id, payload)],
                }),
            )
            .await?;
        check_user_errors(&data.product_variants_bulk_update.user_errors)
    }
}

fn map_status(status: StatusCode, body: String) -> PlatformError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PlatformError::AuthenticationFailed(format!("{status}: {body}"))
        }
        StatusCode::TOO_MANY_REQUESTS => PlatformError::RateLimited(body),
        s if s.is_server_error() => PlatformError::ServerError {
            status: s.as_u16(),
            message: body,
        },
        s => PlatformError::ClientError {
            status: s.as_u16(),
            message: body,
        },
    }
}

fn check_user_errors(errors: &[UserError]) -> PlatformResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PlatformError::UserErrors(UserError::join(errors)))
    }
}

fn remote_id_from(raw: String) -> PlatformResult<RemoteId> {
    RemoteId::new(raw).map_err(PlatformError::InvalidResponse)
}

/// Quotes a value for use inside a Shopify search query
fn search_term(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[async_trait]
impl CommercePlatform for ShopifyPlatform {
    async fn find_by_sku(
        &self,
        session: &StoreSession,
        sku: &str,
    ) -> PlatformResult<Vec<RemoteEntity>> {
        let query = format!(
            "query($q: String!, $after: String) {{ productVariants(first: {VARIANT_PAGE_SIZE}, \
             after: $after, query: $q) {{ nodes {{ id sku product {{ {PRODUCT_FIELDS} }} }} \
             pageInfo {{ hasNextPage endCursor }} }} }}"
        );
        let search = format!("sku:{}", search_term(sku));

        let mut found = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let data: VariantsBySkuData = self
                .execute(
                    session,
                    &query,
                    serde_json::json!({ "q": &search, "after": &cursor }),
                )
                .await?;
            let page = data.product_variants;
            cursor = page.next_cursor().map(str::to_string);

            // The search is tokenised; keep exact matches only.
            for variant in page.nodes {
                if variant.sku.as_deref().map(str::trim) == Some(sku) {
                    found.push(variant.into_entity().map_err(PlatformError::InvalidResponse)?);
                }
            }

            if cursor.is_none() {
                break;
            }
        }
        Ok(found)
    }

    async fn find_by_handle(
        &self,
        session: &StoreSession,
        handle: &str,
    ) -> PlatformResult<Option<RemoteEntity>> {
        let query = format!(
            "query($handle: String!) {{ productByIdentifier(identifier: {{ handle: $handle }}) \
             {{ {PRODUCT_FIELDS} variants(first: 1) {{ nodes {{ id sku }} }} }} }}"
        );
        let data: ProductByIdentifierData = self
            .execute(session, &query, serde_json::json!({ "handle": handle }))
            .await?;

        data.product_by_identifier
            .map(|p| p.into_entity().map_err(PlatformError::InvalidResponse))
            .transpose()
    }

    async fn create_product(
        &self,
        session: &StoreSession,
        payload: &RemoteEntityPayload,
    ) -> PlatformResult<RemoteId> {
        let query = "mutation($product: ProductCreateInput!) { productCreate(product: $product) \
                     { product { id variants(first: 1) { nodes { id sku } } } \
                     userErrors { field message } } }";
        let data: ProductCreateData = self
            .execute(
                session,
                query,
                serde_json::json!({ "product": ProductInput::for_create(payload) }),
            )
            .await?;

        check_user_errors(&data.product_create.user_errors)?;
        let product = data.product_create.product.ok_or_else(|| {
            PlatformError::InvalidResponse("productCreate returned no product".to_string())
        })?;

        tracing::debug!(
            store_id = %session.store().store_id,
            remote_id = %product.id,
            sku = %payload.sku,
            "Created product"
        );
        self.write_variant(session, &product, payload)
            .await
            .map_err(|e| {
                PlatformError::UserErrors(format!(
                    "created {} but could not set sku and price: {e}",
                    product.id
                ))
            })?;
        remote_id_from(product.id)
    }

    async fn update_product(
        &self,
        session: &StoreSession,
        remote_id: &RemoteId,
        payload: &RemoteEntityPayload,
    ) -> PlatformResult<RemoteId> {
        let query = "mutation($product: ProductUpdateInput!) { productUpdate(product: $product) \
                     { product { id variants(first: 1) { nodes { id sku } } } \
                     userErrors { field message } } }";
        let data: ProductUpdateData = self
            .execute(
                session,
                query,
                serde_json::json!({ "product": ProductInput::for_update(remote_id, payload) }),
            )
            .await?;

        check_user_errors(&data.product_update.user_errors)?;
        let product = data.product_update.product.ok_or_else(|| {
            PlatformError::InvalidResponse("productUpdate returned no product".to_string())
        })?;

        self.write_variant(session, &product, payload).await?;
        remote_id_from(product.id)
    }

    async fn delete_product(
        &self,
        session: &StoreSession,
        remote_id: &RemoteId,
    ) -> PlatformResult<()> {
        let query = "mutation($input: ProductDeleteInput!) { productDelete(input: $input) \
                     { deletedProductId userErrors { field message } } }";
        let data: ProductDeleteData = self
            .execute(
                session,
                query,
                serde_json::json!({ "input": { "id": remote_id.as_str() } }),
            )
            .await?;

        check_user_errors(&data.product_delete.user_errors)?;
        tracing::debug!(
            store_id = %session.store().store_id,
            remote_id = %remote_id,
            deleted = ?data.product_delete.deleted_product_id,
            "Deleted product"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "shopify"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::{Store, StoreId};
    use mockito::Matcher;

    const ENDPOINT: &str = "/admin/api/2025-01/graphql.json";

    fn platform(base_url: &str) -> ShopifyPlatform {
        ShopifyPlatform::new(&PlatformConfig {
            base_url_override: Some(base_url.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn session() -> StoreSession {
        StoreSession::new(
            Store::new(StoreId::new("eu").unwrap(), "eu.myshopify.com"),
            secret_string("shpat_test".to_string()),
        )
    }

    fn payload() -> RemoteEntityPayload {
        RemoteEntityPayload {
            title: "Tee".to_string(),
            handle: Some("tee".to_string()),
            description: None,
            price: Some("24.00".to_string()),
            sku: "TEE-01".to_string(),
            tags: vec!["shelfsync:managed".to_string()],
            status: "active".to_string(),
        }
    }

    #[test]
    fn test_endpoint_strips_scheme() {
        let platform = ShopifyPlatform::new(&PlatformConfig::default()).unwrap();
        let session = StoreSession::new(
            Store::new(StoreId::new("eu").unwrap(), "https://eu.myshopify.com/"),
            secret_string("t".to_string()),
        );
        assert_eq!(
            platform.endpoint(&session),
            "https://eu.myshopify.com/admin/api/2025-01/graphql.json"
        );
    }

    #[test]
    fn test_search_term_escapes_quotes() {
        assert_eq!(search_term(r#"A"B"#), r#""A\"B""#);
    }

    #[tokio::test]
    async fn test_find_by_sku_keeps_exact_matches() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", ENDPOINT)
            .match_header("x-shopify-access-token", "shpat_test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":{"productVariants":{"nodes":[
                    {"id":"gid://shopify/ProductVariant/1","sku":"TEE-01",
                     "product":{"id":"gid://shopify/Product/1","status":"ACTIVE",
                                "tags":["shelfsync:managed"],"title":"Tee","handle":"tee"}},
                    {"id":"gid://shopify/ProductVariant/2","sku":"TEE-01-XL",
                     "product":{"id":"gid://shopify/Product/2","status":"ACTIVE",
                                "tags":[],"title":"Tee XL","handle":"tee-xl"}}
                ],"pageInfo":{"hasNextPage":false,"endCursor":null}}}}"#,
            )
            .create_async()
            .await;

        let found = platform(&server.url())
            .find_by_sku(&session(), "TEE-01")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].remote_id.as_str(), "gid://shopify/Product/1");
        assert!(found[0].is_owned());
    }

    #[tokio::test]
    async fn test_find_by_handle_missing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .match_body(Matcher::Regex("productByIdentifier".to_string()))
            .with_status(200)
            .with_body(r#"{"data":{"productByIdentifier":null}}"#)
            .create_async()
            .await;

        let found = platform(&server.url())
            .find_by_handle(&session(), "nope")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_create_product_then_writes_variant() {
        let mut server = mockito::Server::new_async().await;
        let create = server
            .mock("POST", ENDPOINT)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("productCreate".to_string()),
                Matcher::PartialJson(serde_json::json!({
                    "variables": {"product": {"title": "Tee", "status": "ACTIVE", "handle": "tee"}}
                })),
            ]))
            .with_status(200)
            .with_body(
                r#"{"data":{"productCreate":{"product":{"id":"gid://shopify/Product/9",
                    "variants":{"nodes":[{"id":"gid://shopify/ProductVariant/90","sku":null}]}},
                    "userErrors":[]}}}"#,
            )
            .create_async()
            .await;
        let variants = server
            .mock("POST", ENDPOINT)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("productVariantsBulkUpdate".to_string()),
                Matcher::PartialJson(serde_json::json!({
                    "variables": {
                        "productId": "gid://shopify/Product/9",
                        "variants": [{"id": "gid://shopify/ProductVariant/90", "price": "24.00",
                                      "inventoryItem": {"sku": "TEE-01"}}]
                    }
                })),
            ]))
            .with_status(200)
            .with_body(r#"{"data":{"productVariantsBulkUpdate":{"userErrors":[]}}}"#)
            .create_async()
            .await;

        let id = platform(&server.url())
            .create_product(&session(), &payload())
            .await
            .unwrap();

        create.assert_async().await;
        variants.assert_async().await;
        assert_eq!(id.as_str(), "gid://shopify/Product/9");
    }

    #[tokio::test]
    async fn test_find_by_sku_follows_pages() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", ENDPOINT)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "variables": {"after": null}
            })))
            .with_status(200)
            .with_body(
                r#"{"data":{"productVariants":{"nodes":[
                    {"id":"gid://shopify/ProductVariant/1","sku":"TEE-01-XL",
                     "product":{"id":"gid://shopify/Product/1","status":"ACTIVE",
                                "tags":[],"title":"Tee XL","handle":"tee-xl"}}
                ],"pageInfo":{"hasNextPage":true,"endCursor":"c1"}}}}"#,
            )
            .create_async()
            .await;
        let second = server
            .mock("POST", ENDPOINT)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "variables": {"after": "c1"}
            })))
            .with_status(200)
            .with_body(
                r#"{"data":{"productVariants":{"nodes":[
                    {"id":"gid://shopify/ProductVariant/2","sku":"TEE-01",
                     "product":{"id":"gid://shopify/Product/2","status":"ACTIVE",
                                "tags":["shelfsync:managed"],"title":"Tee","handle":"tee"}}
                ],"pageInfo":{"hasNextPage":false,"endCursor":"c2"}}}}"#,
            )
            .create_async()
            .await;

        let found = platform(&server.url())
            .find_by_sku(&session(), "TEE-01")
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].remote_id.as_str(), "gid://shopify/Product/2");
    }

    #[tokio::test]
    async fn test_create_product_user_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_body(
                r#"{"data":{"productCreate":{"product":null,
                    "userErrors":[{"field":["input","handle"],"message":"Handle has already been taken"}]}}}"#,
            )
            .create_async()
            .await;

        let err = platform(&server.url())
            .create_product(&session(), &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::UserErrors(msg) if msg.contains("already been taken")));
    }

    #[tokio::test]
    async fn test_update_product_writes_variant() {
        let mut server = mockito::Server::new_async().await;
        let update = server
            .mock("POST", ENDPOINT)
            .match_body(Matcher::Regex("productUpdate".to_string()))
            .with_status(200)
            .with_body(
                r#"{"data":{"productUpdate":{"product":{"id":"gid://shopify/Product/9",
                    "variants":{"nodes":[{"id":"gid://shopify/ProductVariant/90","sku":"OLD"}]}},
                    "userErrors":[]}}}"#,
            )
            .create_async()
            .await;
        let variants = server
            .mock("POST", ENDPOINT)
            .match_body(Matcher::Regex("productVariantsBulkUpdate".to_string()))
            .with_status(200)
            .with_body(r#"{"data":{"productVariantsBulkUpdate":{"userErrors":[]}}}"#)
            .create_async()
            .await;

        let id = RemoteId::new("gid://shopify/Product/9").unwrap();
        let result = platform(&server.url())
            .update_product(&session(), &id, &payload())
            .await
            .unwrap();

        update.assert_async().await;
        variants.assert_async().await;
        assert_eq!(result, id);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", ENDPOINT)
            .match_body(Matcher::Regex("productDelete".to_string()))
            .with_status(200)
            .with_body(
                r#"{"data":{"productDelete":{"deletedProductId":"gid://shopify/Product/9","userErrors":[]}}}"#,
            )
            .create_async()
            .await;

        let id = RemoteId::new("gid://shopify/Product/9").unwrap();
        platform(&server.url())
            .delete_product(&session(), &id)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(401)
            .with_body("[API] Invalid API key or access token")
            .create_async()
            .await;

        let err = platform(&server.url())
            .find_by_sku(&session(), "TEE-01")
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn test_graphql_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_body(r#"{"errors":[{"message":"Throttled"}]}"#)
            .create_async()
            .await;

        let err = platform(&server.url())
            .find_by_handle(&session(), "tee")
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::GraphQl(msg) if msg == "Throttled"));
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            PlatformError::RateLimited(_)
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, String::new()),
            PlatformError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            map_status(StatusCode::UNPROCESSABLE_ENTITY, String::new()),
            PlatformError::ClientError { status: 422, .. }
        ));
    }
}
