//! Error types for market data and analytics operations

use thiserror::Error;

/// Market data specific errors
///
/// None of these are fatal to the process: adapter failures are recovered by
/// the next source in the chain, and an exhausted chain degrades to the
/// bundled sample series.
#[derive(Debug, Error)]
pub enum MarketError {
    /// One provider failed (network, non-2xx, empty or malformed payload)
    #[error("Provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    /// Rate limit signal from a provider
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// API key for a provider is not configured; the adapter is disabled
    #[error("Missing API key for {provider}")]
    MissingApiKey { provider: String },

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Requested time range is inverted or otherwise unusable
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MarketError {
    /// Name of the provider this error belongs to, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::ProviderUnavailable { provider, .. }
            | Self::RateLimitExceeded { provider }
            | Self::MissingApiKey { provider } => Some(provider),
            _ => None,
        }
    }
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;
