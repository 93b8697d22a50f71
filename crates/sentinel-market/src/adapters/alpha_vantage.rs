//! Alpha Vantage adapter
//!
//! Requires `ALPHA_VANTAGE_API_KEY`; the free tier allows 5 requests per
//! minute, enforced locally with a rate limiter. A "Note" payload is the
//! provider's rate-limit signal.

use crate::adapters::{ProviderAdapter, ProviderId};
use crate::error::{MarketError, Result};
use crate::series::{PriceBar, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;

const BASE_URL: &str = "https://www.alphavantage.co/query";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

pub struct AlphaVantageAdapter {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageAdapter {
    /// Create an adapter with an API key and a requests-per-minute budget
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(5).expect("5 is non-zero")));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    fn provider_error(reason: impl Into<String>) -> MarketError {
        MarketError::ProviderUnavailable {
            provider: ProviderId::AlphaVantage.as_str().to_string(),
            reason: reason.into(),
        }
    }

    fn parse_field(values: &serde_json::Value, field: &str) -> Option<f64> {
        values.get(field)?.as_str()?.parse().ok()
    }
}

#[async_trait]
impl ProviderAdapter for AlphaVantageAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::AlphaVantage
    }

    async fn fetch(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::provider_error(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: serde_json::Value = response.json().await?;

        if let Some(error) = data.get("Error Message") {
            return Err(Self::provider_error(error.to_string()));
        }
        if data.get("Note").is_some() || data.get("Information").is_some() {
            return Err(MarketError::RateLimitExceeded {
                provider: ProviderId::AlphaVantage.as_str().to_string(),
            });
        }

        let series = data
            .get("Time Series (Daily)")
            .and_then(|s| s.as_object())
            .ok_or_else(|| Self::provider_error("no time series data in payload"))?;

        let mut bars = Vec::with_capacity(series.len());
        for (date, values) in series {
            let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
                continue;
            };
            let Some(timestamp) = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()) else {
                continue;
            };
            if timestamp < start || timestamp > end {
                continue;
            }

            let (Some(open), Some(high), Some(low), Some(close)) = (
                Self::parse_field(values, "1. open"),
                Self::parse_field(values, "2. high"),
                Self::parse_field(values, "3. low"),
                Self::parse_field(values, "4. close"),
            ) else {
                continue;
            };
            let volume = values
                .get("5. volume")
                .and_then(|v| v.as_str())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);

            bars.push(PriceBar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        Ok(PriceSeries::new(symbol, bars))
    }
}
