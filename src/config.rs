//! Environment-based configuration for the upstream market API

use std::env;

use crate::error::{MarketError, Result};

/// Default upstream API base URL, overridable via `API_URL`
pub const DEFAULT_API_URL: &str = "https://api.opsucht.net";

/// Upstream API connection settings
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Creates a config with a normalized base URL (no trailing slash).
    pub fn new(base_url: String, username: String, password: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
        }
    }

    /// Reads the config from `API_URL`, `API_USERNAME` and `API_PASSWORD`.
    ///
    /// The base URL falls back to [`DEFAULT_API_URL`]; the credentials are
    /// required.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let username = env::var("API_USERNAME")
            .map_err(|_| MarketError::Config("API_USERNAME is not set".to_string()))?;
        let password = env::var("API_PASSWORD")
            .map_err(|_| MarketError::Config("API_PASSWORD is not set".to_string()))?;
        Ok(Self::new(base_url, username, password))
    }
}
