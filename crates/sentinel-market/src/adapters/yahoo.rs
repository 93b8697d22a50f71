//! Yahoo Finance adapter
//!
//! The only keyless provider; by default it sits first in the fallback
//! chain.

use crate::adapters::{ProviderAdapter, ProviderId};
use crate::error::{MarketError, Result};
use crate::series::{PriceBar, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

#[derive(Debug, Default, Clone)]
pub struct YahooAdapter {}

impl YahooAdapter {
    pub fn new() -> Self {
        Self {}
    }

    fn provider_error(err: impl std::fmt::Display) -> MarketError {
        MarketError::ProviderUnavailable {
            provider: ProviderId::Yahoo.as_str().to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    async fn fetch(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        let provider = yahoo::YahooConnector::new().map_err(Self::provider_error)?;

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(Self::provider_error)?;
        let end_odt =
            OffsetDateTime::from_unix_timestamp(end.timestamp()).map_err(Self::provider_error)?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(Self::provider_error)?;

        let quotes = response.quotes().map_err(Self::provider_error)?;

        let bars = quotes
            .iter()
            .filter_map(|q| {
                let timestamp = DateTime::from_timestamp(q.timestamp as i64, 0)?;
                Some(PriceBar {
                    timestamp,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        Ok(PriceSeries::new(symbol, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires network access
    async fn fetch_month_of_daily_bars() {
        let adapter = YahooAdapter::new();
        let end = Utc::now();
        let start = end - chrono::Duration::days(30);

        let series = adapter.fetch("AAPL", start, end).await.unwrap();
        assert!(!series.is_empty());
        assert_eq!(series.symbol(), "AAPL");
    }
}
