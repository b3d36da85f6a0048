//! Tests for the market data cache.
//!
//! Uses wiremock request-count expectations to pin down the caching
//! contract: what is fetched once, what is refetched, and what coalesces
//! under concurrent access.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::Config;
use crate::market::cache::{with_deadline, MarketCache};
use crate::market::client::{MarketClient, OrderSide};

fn test_cache(server: &MockServer) -> MarketCache {
    MarketCache::new(MarketClient::new(Config::new(
        server.uri(),
        "bot".to_string(),
        "secret".to_string(),
    )))
}

fn price_payload() -> serde_json::Value {
    json!({
        "Ores": {
            "iron_ingot": [
                {"orderSide": "BUY", "price": 120, "activeOrders": 4},
                {"orderSide": "SELL", "price": 140, "activeOrders": 2}
            ],
            "gold_ingot": [
                {"orderSide": "SELL", "price": 300, "activeOrders": 1}
            ]
        },
        "Farming": {
            "wheat": [
                {"orderSide": "BUY", "price": 5, "activeOrders": 10}
            ]
        }
    })
}

async fn mount_categories(server: &MockServer, body: serde_json::Value, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/market/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_prices(server: &MockServer, body: serde_json::Value, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/market/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(hits)
        .mount(server)
        .await;
}

// ── category store ───────────────────────────────────────────────────

#[tokio::test]
async fn categories_fetched_once() {
    let server = MockServer::start().await;
    mount_categories(&server, json!(["Ores", "Farming"]), 1).await;

    let cache = test_cache(&server);
    let first = cache.categories().await;
    let second = cache.categories().await;
    assert_eq!(first, vec!["Ores", "Farming"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn categories_sticky_after_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/market/categories"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let cache = test_cache(&server);
    assert!(cache.categories().await.is_empty());
    // Second call must serve the cached empty list, not refetch.
    assert!(cache.categories().await.is_empty());
}

#[tokio::test]
async fn categories_sticky_after_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/market/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let cache = test_cache(&server);
    assert!(cache.categories().await.is_empty());
    assert!(cache.categories().await.is_empty());
}

#[tokio::test]
async fn invalidate_categories_triggers_refetch() {
    let server = MockServer::start().await;
    mount_categories(&server, json!(["Ores"]), 2).await;

    let cache = test_cache(&server);
    assert_eq!(cache.categories().await, vec!["Ores"]);
    cache.invalidate_categories().await;
    assert_eq!(cache.categories().await, vec!["Ores"]);
}

#[tokio::test]
async fn concurrent_first_categories_share_one_fetch() {
    let server = MockServer::start().await;
    mount_categories(&server, json!(["Ores", "Farming"]), 1).await;

    let cache = test_cache(&server);
    let (first, second) = tokio::join!(cache.categories(), cache.categories());
    assert_eq!(first, second);
}

// ── item/order cache ─────────────────────────────────────────────────

#[tokio::test]
async fn items_for_category_populates_orders() {
    let server = MockServer::start().await;
    mount_prices(&server, price_payload(), 1).await;

    let cache = test_cache(&server);
    let ids = cache.items_for_category("Ores").await;
    assert_eq!(ids, vec!["gold_ingot", "iron_ingot"]);

    let orders = cache.orders("iron_ingot").await;
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_side, OrderSide::Buy);
    assert!((orders[0].price - 120.0).abs() < f64::EPSILON);

    let entry = cache.item("iron_ingot").await.unwrap();
    assert_eq!(entry.category, "Ores");
}

#[tokio::test]
async fn items_for_category_absent_category_leaves_cache_untouched() {
    let server = MockServer::start().await;
    mount_prices(&server, price_payload(), 1).await;

    let cache = test_cache(&server);
    assert!(cache.items_for_category("Nether").await.is_empty());
    // Nothing was merged from the payload.
    assert!(cache.orders("iron_ingot").await.is_empty());
    assert!(cache.item("iron_ingot").await.is_none());
}

#[tokio::test]
async fn repeated_category_fetch_is_idempotent() {
    let server = MockServer::start().await;
    mount_prices(&server, price_payload(), 2).await;

    let cache = test_cache(&server);
    let first = cache.items_for_category("Ores").await;
    let orders_after_first = cache.orders("iron_ingot").await;

    let second = cache.items_for_category("Ores").await;
    let orders_after_second = cache.orders("iron_ingot").await;

    assert_eq!(first, second);
    assert_eq!(orders_after_first, orders_after_second);
}

#[tokio::test]
async fn later_fetch_overwrites_item_orders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/market/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Ores": {"iron_ingot": [{"orderSide": "BUY", "price": 120, "activeOrders": 4}]}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/market/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Ores": {"iron_ingot": [{"orderSide": "BUY", "price": 150, "activeOrders": 7}]}
        })))
        .mount(&server)
        .await;

    let cache = test_cache(&server);
    cache.items_for_category("Ores").await;
    assert!((cache.orders("iron_ingot").await[0].price - 120.0).abs() < f64::EPSILON);

    cache.items_for_category("Ores").await;
    let orders = cache.orders("iron_ingot").await;
    assert!((orders[0].price - 150.0).abs() < f64::EPSILON);
    assert_eq!(orders[0].active_orders, 7);
}

#[tokio::test]
async fn category_merge_leaves_other_categories_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/market/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(price_payload()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // Later payload drops Farming entirely and re-prices Ores.
    Mock::given(method("GET"))
        .and(path("/market/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Ores": {"iron_ingot": [{"orderSide": "BUY", "price": 99, "activeOrders": 1}]}
        })))
        .mount(&server)
        .await;

    let cache = test_cache(&server);
    cache.items_for_category("Ores").await;
    cache.items_for_category("Farming").await;
    cache.items_for_category("Ores").await;

    // Ores re-priced, Farming's entry still present (additive-only cache).
    assert!((cache.orders("iron_ingot").await[0].price - 99.0).abs() < f64::EPSILON);
    assert_eq!(cache.item("wheat").await.unwrap().category, "Farming");
}

// ── full catalog / synchronizer ──────────────────────────────────────

#[tokio::test]
async fn full_catalog_builds_once_and_memoizes() {
    let server = MockServer::start().await;
    mount_categories(&server, json!(["Ores", "Farming", "Nether"]), 1).await;
    // One prices round trip per category, and none for the second call.
    mount_prices(&server, price_payload(), 3).await;

    let cache = test_cache(&server);
    let catalog = cache.full_catalog().await;
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog["iron_ingot"].category, "Ores");
    assert_eq!(catalog["wheat"].category, "Farming");
    // "Nether" is absent from the price data and contributes nothing.

    let again = cache.full_catalog().await;
    assert_eq!(catalog, again);
}

#[tokio::test]
async fn full_catalog_served_from_partially_populated_cache() {
    let server = MockServer::start().await;
    // No categories mock: a populated cache must not hit the network.
    mount_prices(&server, price_payload(), 1).await;

    let cache = test_cache(&server);
    cache.items_for_category("Ores").await;

    let catalog = cache.full_catalog().await;
    assert_eq!(catalog.len(), 2);
    assert!(catalog.contains_key("iron_ingot"));
    assert!(!catalog.contains_key("wheat"));
}

#[tokio::test]
async fn full_catalog_empty_when_categories_unavailable() {
    let server = MockServer::start().await;
    mount_categories(&server, json!([]), 1).await;

    let cache = test_cache(&server);
    assert!(cache.full_catalog().await.is_empty());
    assert!(cache.items_for_category("Ores").await.is_empty());
}

#[tokio::test]
async fn concurrent_cold_full_catalog_coalesces() {
    let server = MockServer::start().await;
    // Single-flight: both callers must share one build - one categories
    // request and one prices request per category.
    mount_categories(&server, json!(["Ores", "Farming"]), 1).await;
    mount_prices(&server, price_payload(), 2).await;

    let cache = test_cache(&server);
    let (first, second) = tokio::join!(cache.full_catalog(), cache.full_catalog());
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

// ── deadlines ────────────────────────────────────────────────────────

#[tokio::test]
async fn with_deadline_passes_result_through() {
    let result = with_deadline(Duration::from_secs(1), async { vec!["Ores".to_string()] }).await;
    assert_eq!(result, vec!["Ores"]);
}

#[tokio::test]
async fn with_deadline_degrades_to_empty_on_expiry() {
    let result: Vec<String> = with_deadline(Duration::from_millis(10), async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        vec!["too late".to_string()]
    })
    .await;
    assert!(result.is_empty());
}
