//! Finnhub stock-candle adapter
//!
//! Requires `FINNHUB_API_KEY`; the free tier allows 60 requests per minute.
//! Candles come back as parallel arrays plus a status field; `no_data`
//! counts as an adapter failure so the chain moves on.

use crate::adapters::{ProviderAdapter, ProviderId};
use crate::error::{MarketError, Result};
use crate::series::{PriceBar, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;

const BASE_URL: &str = "https://finnhub.io/api/v1/stock/candle";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Candle response: parallel arrays keyed by single letters
#[derive(Debug, Deserialize)]
struct CandleResponse {
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    t: Vec<i64>,
    #[serde(default)]
    v: Vec<f64>,
    s: String,
}

pub struct FinnhubAdapter {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl FinnhubAdapter {
    /// Create an adapter with an API key and a requests-per-minute budget
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(60).expect("60 is non-zero")),
        );

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    fn provider_error(reason: impl Into<String>) -> MarketError {
        MarketError::ProviderUnavailable {
            provider: ProviderId::Finnhub.as_str().to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for FinnhubAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Finnhub
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
                ("symbol", symbol),
                ("resolution", "D"),
                ("from", &start.timestamp().to_string()),
                ("to", &end.timestamp().to_string()),
                ("token", &self.api_key),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketError::RateLimitExceeded {
                provider: ProviderId::Finnhub.as_str().to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Self::provider_error(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let candles: CandleResponse = response.json().await?;
        if candles.s != "ok" {
            return Err(Self::provider_error(format!(
                "candle status: {}",
                candles.s
            )));
        }

        let bars = candles
            .t
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                Some(PriceBar {
                    timestamp: DateTime::from_timestamp(ts, 0)?,
                    open: *candles.o.get(i)?,
                    high: *candles.h.get(i)?,
                    low: *candles.l.get(i)?,
                    close: *candles.c.get(i)?,
                    volume: candles.v.get(i).map_or(0, |v| *v as u64),
                })
            })
            .collect();

        Ok(PriceSeries::new(symbol, bars))
    }
}
