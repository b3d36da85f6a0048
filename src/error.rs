//! Error types for market_cache

use std::fmt;

/// Unified error type for market_cache operations
#[derive(Debug)]
pub enum MarketError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse JSON data
    Parse(serde_json::Error),
    /// HTTP error status code
    HttpStatus(reqwest::StatusCode),
    /// File I/O error
    Io(std::io::Error),
    /// Missing or invalid configuration
    Config(String),
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::Network(e) => write!(f, "Network error: {}", e),
            MarketError::Parse(e) => write!(f, "Parse error: {}", e),
            MarketError::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            MarketError::Io(e) => write!(f, "I/O error: {}", e),
            MarketError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MarketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarketError::Network(e) => Some(e),
            MarketError::Parse(e) => Some(e),
            MarketError::Io(e) => Some(e),
            MarketError::HttpStatus(_) => None,
            MarketError::Config(_) => None,
        }
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        MarketError::Network(err)
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::Parse(err)
    }
}

impl From<std::io::Error> for MarketError {
    fn from(err: std::io::Error) -> Self {
        MarketError::Io(err)
    }
}

/// Result alias for market_cache operations
pub type Result<T> = std::result::Result<T, MarketError>;
