//! Provider adapters normalizing external APIs into `PriceSeries`

pub mod alpha_vantage;
pub mod finnhub;
pub mod sample;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageAdapter;
pub use finnhub::FinnhubAdapter;
pub use sample::SampleData;
pub use yahoo::YahooAdapter;

use crate::error::Result;
use crate::series::PriceSeries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Source name tagged on results substituted from the bundled sample data
pub const SAMPLE_SOURCE_NAME: &str = "sample";

/// Canonical identifiers for the real providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Yahoo,
    AlphaVantage,
    Finnhub,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::AlphaVantage => "alpha_vantage",
            Self::Finnhub => "finnhub",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = crate::error::MarketError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "alpha_vantage" | "alphavantage" => Ok(Self::AlphaVantage),
            "finnhub" => Ok(Self::Finnhub),
            other => Err(crate::error::MarketError::Config(format!(
                "unknown provider: {other}"
            ))),
        }
    }
}

/// One external provider, normalized to the common series shape
///
/// An adapter fails on network errors, non-2xx responses, empty payloads and
/// provider rate-limit signals; the selector skips to the next adapter
/// without retrying.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Identifier used as `source_name` on results this adapter serves
    fn id(&self) -> ProviderId;

    /// Fetch daily bars for `symbol` over `[start, end]`
    async fn fetch(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_round_trip() {
        for id in [ProviderId::Yahoo, ProviderId::AlphaVantage, ProviderId::Finnhub] {
            assert_eq!(id.as_str().parse::<ProviderId>().unwrap(), id);
        }
    }

    #[test]
    fn provider_id_unknown_rejected() {
        assert!("bloomberg".parse::<ProviderId>().is_err());
    }
}
