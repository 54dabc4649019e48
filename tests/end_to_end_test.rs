//! End-to-end test over the real adapters
//!
//! A JSON workbook on disk feeds the catalog and a mock HTTP server plays
//! the Shopify Admin API.

use mockito::Matcher;
use shelfsync::adapters::credentials::ConfigCredentials;
use shelfsync::adapters::platform::create_platform;
use shelfsync::adapters::sheets::create_source;
use shelfsync::config::parse_config;
use shelfsync::core::sync::{ApplyStatus, SyncCoordinator, SyncFilter, SyncOptions};
use shelfsync::domain::PlannedAction;
use std::sync::Arc;
use tempfile::TempDir;

const ENDPOINT: &str = "/admin/api/2025-01/graphql.json";

fn write_workbook(dir: &TempDir) -> String {
    let workbook = serde_json::json!({
        "Stores": [
            ["store_id", "domain", "currency", "price_multiplier"],
            ["eu", "eu.myshopify.com", "EUR", 1.5]
        ],
        "Products": [
            ["internal_product_id", "master_sku", "internal_name", "base_price", "tags"],
            ["P-1", "TEE-01", "Cotton Tee", 20, "summer"]
        ],
        "StoreProducts": [
            ["store_id", "internal_product_id", "sync_action"],
            ["eu", "P-1", "create"],
            ["eu", "P-1", "archive"]
        ]
    });
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, workbook.to_string()).unwrap();
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn test_workbook_rows_reach_shopify() {
    let dir = TempDir::new().unwrap();
    let workbook = write_workbook(&dir);
    let mut server = mockito::Server::new_async().await;

    let lookup = server
        .mock("POST", ENDPOINT)
        .match_header("x-shopify-access-token", "shpat_e2e")
        .match_body(Matcher::Regex(r"productVariants\(first".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data":{"productVariants":{"nodes":[],
                "pageInfo":{"hasNextPage":false,"endCursor":null}}}}"#,
        )
        .create_async()
        .await;
    let create = server
        .mock("POST", ENDPOINT)
        .match_header("x-shopify-access-token", "shpat_e2e")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "variables": {"product": {
                "title": "Cotton Tee",
                "tags": ["summer", "shelfsync:managed"]
            }}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data":{"productCreate":{"product":{"id":"gid://shopify/Product/501",
                "variants":{"nodes":[{"id":"gid://shopify/ProductVariant/5010","sku":"TEE-01"}]}},
                "userErrors":[]}}}"#,
        )
        .create_async()
        .await;
    let variant = server
        .mock("POST", ENDPOINT)
        .match_header("x-shopify-access-token", "shpat_e2e")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "variables": {
                "productId": "gid://shopify/Product/501",
                "variants": [{
                    "id": "gid://shopify/ProductVariant/5010",
                    "price": "30.00",
                    "inventoryItem": {"sku": "TEE-01"}
                }]
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"productVariantsBulkUpdate":{"userErrors":[]}}}"#)
        .create_async()
        .await;

    let config = parse_config(&format!(
        r#"
[source]
kind = "file"
path = "{workbook}"

[platform]
base_url_override = "{}"

[credentials]
eu = "shpat_e2e"
"#,
        server.url()
    ))
    .unwrap();

    let coordinator = SyncCoordinator::new(
        create_source(&config.source).unwrap(),
        create_platform(&config.platform).unwrap(),
        Arc::new(ConfigCredentials::from_config(&config)),
        SyncOptions::from_config(&config),
    );

    let report = coordinator.sync(&SyncFilter::all()).await.unwrap();

    lookup.assert_async().await;
    create.assert_async().await;
    variant.assert_async().await;

    assert_eq!(report.processed, 2);
    let created = &report.results[0];
    assert_eq!(created.status, ApplyStatus::Success);
    assert_eq!(created.action, Some(PlannedAction::Create));
    assert_eq!(
        created.remote_id.as_ref().map(|id| id.as_str()),
        Some("gid://shopify/Product/501")
    );
    assert_eq!(report.results[1].status, ApplyStatus::Skipped);
}
