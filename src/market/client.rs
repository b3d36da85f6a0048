//! Upstream market API client
//!
//! Issues one HTTP GET per call against the categories, prices and items
//! endpoints, authenticated with fixed Basic-Auth credentials. Empty and
//! malformed response bodies both degrade to empty results with a logged
//! diagnostic; only transport failures and error status codes are typed
//! errors.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{MarketError, Result};

/// Fixed User-Agent sent with every upstream request
const USER_AGENT: &str = "market_cache/1.0";

/// Per-request timeout; the upstream transport has none of its own
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CATEGORIES_PATH: &str = "/market/categories";
const PRICES_PATH: &str = "/market/prices";
const ITEMS_PATH: &str = "/market/items";

/// Side of a standing market order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// A standing buy or sell offer for an item
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_side: OrderSide,
    pub price: f64,
    pub active_orders: u32,
}

/// Cached market data for a single item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEntry {
    pub category: String,
    pub orders: Vec<Order>,
}

impl ItemEntry {
    /// First order of the given side, in upstream array order.
    ///
    /// The upstream arrays are not re-sorted, so "first" is whatever the
    /// API put in front - not necessarily the best price.
    pub fn best_order(&self, side: OrderSide) -> Option<&Order> {
        self.orders.iter().find(|order| order.order_side == side)
    }
}

/// Categories arrive either as plain strings or as objects with a `name`
/// field, depending on the upstream deployment.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Name(String),
    Object { name: String },
}

impl CategoryRepr {
    fn into_name(self) -> String {
        match self {
            CategoryRepr::Name(name) => name,
            CategoryRepr::Object { name } => name,
        }
    }
}

/// HTTP client for the upstream market API
#[derive(Debug, Clone)]
pub struct MarketClient {
    client: reqwest::Client,
    config: Config,
}

impl MarketClient {
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetches the category list, normalized to plain names.
    pub async fn fetch_categories(&self) -> Result<Vec<String>> {
        let raw: Option<Vec<CategoryRepr>> = self.get_json(CATEGORIES_PATH).await?;
        let categories: Vec<String> = raw
            .unwrap_or_default()
            .into_iter()
            .map(CategoryRepr::into_name)
            .collect();
        log::debug!("fetched {} categories", categories.len());
        Ok(categories)
    }

    /// Fetches the price data and extracts one category's order book.
    ///
    /// A category that is absent from the payload, or whose data is not an
    /// item map, yields an empty result.
    pub async fn fetch_category_orders(
        &self,
        category: &str,
    ) -> Result<HashMap<String, Vec<Order>>> {
        let raw: Option<HashMap<String, serde_json::Value>> =
            self.get_json(PRICES_PATH).await?;
        let value = match raw.and_then(|mut by_category| by_category.remove(category)) {
            Some(value) => value,
            None => {
                log::debug!("category '{}' not present in price data", category);
                return Ok(HashMap::new());
            }
        };
        match serde_json::from_value(value) {
            Ok(items) => Ok(items),
            Err(e) => {
                log::warn!("malformed order data for category '{}': {}", category, e);
                Ok(HashMap::new())
            }
        }
    }

    /// Fetches the full item map across all categories in one request.
    ///
    /// Category values that are not item maps are skipped.
    pub async fn fetch_all_items(&self) -> Result<HashMap<String, ItemEntry>> {
        let raw: Option<HashMap<String, serde_json::Value>> =
            self.get_json(ITEMS_PATH).await?;
        let mut all_items = HashMap::new();
        for (category, value) in raw.unwrap_or_default() {
            let items: HashMap<String, Vec<Order>> = match serde_json::from_value(value) {
                Ok(items) => items,
                Err(e) => {
                    log::debug!("skipping category '{}': not an item map ({})", category, e);
                    continue;
                }
            };
            for (item_id, orders) in items {
                all_items.insert(
                    item_id,
                    ItemEntry {
                        category: category.clone(),
                        orders,
                    },
                );
            }
        }
        log::debug!("fetched {} items", all_items.len());
        Ok(all_items)
    }

    /// Fetches `path` and parses the body, degrading empty and malformed
    /// payloads to `None`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let body = self.get_text(path).await?;
        if body.trim().is_empty() {
            log::warn!("empty response body from {}", path);
            return Ok(None);
        }
        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                log::warn!("malformed JSON from {}: {}", path, e);
                Ok(None)
            }
        }
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.config.base_url, path);
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MarketError::HttpStatus(response.status()));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
