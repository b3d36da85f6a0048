//! Market API access and in-memory caching

pub mod cache;
pub mod client;

pub use cache::{with_deadline, MarketCache, INTERACTIVE_TIMEOUT};
pub use client::{ItemEntry, MarketClient, Order, OrderSide};
