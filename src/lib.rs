//! Market Cache - marketplace price data for chat-bot lookups
//!
//! Fetches category and item/order data from the upstream market API,
//! caches it in memory, and serves fast, case-insensitive,
//! translation-aware lookups for interactive autocomplete and detail
//! queries.

pub mod config;
pub mod error;
pub mod market;
pub mod translations;

pub use config::Config;
pub use error::{MarketError, Result};
pub use market::{
    with_deadline, ItemEntry, MarketCache, MarketClient, Order, OrderSide, INTERACTIVE_TIMEOUT,
};
pub use translations::{Suggestion, Translations, MAX_SUGGESTIONS};
