//! In-memory market data cache
//!
//! Owns the category list and the item/order book, populating both lazily
//! from the upstream client. Each cache region sits behind a mutex that is
//! held across the populating fetch, so concurrent first callers share one
//! upstream round trip instead of racing to issue duplicates.
//!
//! All lookup operations are fail-soft: upstream failures are logged and
//! surfaced as empty results, never as errors.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;

use super::client::{ItemEntry, MarketClient, Order};

/// Deadline applied to interactive lookup paths (autocomplete)
pub const INTERACTIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide cache of market categories and item order books
pub struct MarketCache {
    client: MarketClient,
    // Lock order: items before categories. No path takes them in reverse.
    categories: Mutex<Option<Vec<String>>>,
    items: Mutex<HashMap<String, ItemEntry>>,
}

impl MarketCache {
    pub fn new(client: MarketClient) -> Self {
        Self {
            client,
            categories: Mutex::new(None),
            items: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the category list, fetching it on first use.
    ///
    /// The first result is cached for the process lifetime, including an
    /// empty result from a failed, empty or malformed upstream fetch.
    /// [`invalidate_categories`](Self::invalidate_categories) is the only
    /// way to retry after that.
    pub async fn categories(&self) -> Vec<String> {
        let mut cached = self.categories.lock().await;
        if let Some(list) = cached.as_ref() {
            return list.clone();
        }
        let fetched = match self.client.fetch_categories().await {
            Ok(list) => list,
            Err(e) => {
                log::warn!("category fetch failed: {}", e);
                Vec::new()
            }
        };
        log::info!("cached {} categories", fetched.len());
        *cached = Some(fetched.clone());
        fetched
    }

    /// Clears the cached category list so the next call refetches.
    pub async fn invalidate_categories(&self) {
        *self.categories.lock().await = None;
    }

    /// Fetches one category's order data and merges it into the cache.
    ///
    /// Returns the item identifiers belonging to `category`, sorted for
    /// deterministic output. Entries are upserted by item identifier;
    /// items of other categories are left untouched. An absent category or
    /// a failed fetch yields an empty list and does not mutate the cache.
    pub async fn items_for_category(&self, category: &str) -> Vec<String> {
        let fetched = match self.client.fetch_category_orders(category).await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("order fetch for category '{}' failed: {}", category, e);
                return Vec::new();
            }
        };
        if fetched.is_empty() {
            return Vec::new();
        }
        let mut items = self.items.lock().await;
        let mut ids: Vec<String> = Vec::with_capacity(fetched.len());
        for (item_id, orders) in fetched {
            items.insert(
                item_id.clone(),
                ItemEntry {
                    category: category.to_string(),
                    orders,
                },
            );
            ids.push(item_id);
        }
        ids.sort();
        log::debug!("cached {} items for category '{}'", ids.len(), category);
        ids
    }

    /// Returns the full catalog, building it on first use.
    ///
    /// A non-empty cache is returned as-is with no network activity, even
    /// if it was only partially populated by earlier per-category calls.
    /// An empty cache triggers one price fetch per category, in category
    /// store order; a category whose fetch fails or comes back empty
    /// contributes no items and the build continues.
    pub async fn full_catalog(&self) -> HashMap<String, ItemEntry> {
        let mut items = self.items.lock().await;
        if !items.is_empty() {
            return items.clone();
        }
        let categories = self.categories().await;
        for category in &categories {
            let fetched = match self.client.fetch_category_orders(category).await {
                Ok(items) => items,
                Err(e) => {
                    log::warn!("skipping category '{}': {}", category, e);
                    continue;
                }
            };
            for (item_id, orders) in fetched {
                items.insert(
                    item_id,
                    ItemEntry {
                        category: category.clone(),
                        orders,
                    },
                );
            }
        }
        log::info!(
            "catalog sync complete: {} items across {} categories",
            items.len(),
            categories.len()
        );
        items.clone()
    }

    /// Direct cache read of an item's orders; empty if the item is unknown.
    pub async fn orders(&self, item_id: &str) -> Vec<Order> {
        self.items
            .lock()
            .await
            .get(item_id)
            .map(|entry| entry.orders.clone())
            .unwrap_or_default()
    }

    /// Direct cache read of an item's category and orders.
    pub async fn item(&self, item_id: &str) -> Option<ItemEntry> {
        self.items.lock().await.get(item_id).cloned()
    }
}

/// Runs an interactive lookup with a deadline, degrading to the empty
/// value when it expires.
pub async fn with_deadline<T, F>(limit: Duration, lookup: F) -> T
where
    T: Default,
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, lookup).await {
        Ok(value) => value,
        Err(_) => {
            log::warn!("lookup timed out after {:?}", limit);
            T::default()
        }
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
