//! Source selector: tries adapters in priority order, falls back to sample
//! data, and caches what it fetched

use crate::adapters::{
    AlphaVantageAdapter, FinnhubAdapter, ProviderAdapter, ProviderId, SAMPLE_SOURCE_NAME,
    SampleData, YahooAdapter,
};
use crate::cache::{CacheKey, SeriesCache};
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::series::FetchResult;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Resolves fetches against the adapter chain
///
/// Adapters are tried sequentially in priority order; a failed adapter is
/// skipped, not retried. With the chain exhausted the bundled sample series
/// is substituted, so `fetch` always yields data for a valid request. The
/// cache is owned here with an explicit lifecycle rather than living in
/// module state.
pub struct SourceSelector {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    sample: SampleData,
    cache: SeriesCache,
    served_by: RwLock<HashMap<String, String>>,
}

impl SourceSelector {
    /// Build a selector with an explicit adapter chain
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>, cache: SeriesCache) -> Self {
        Self {
            adapters,
            sample: SampleData::new(),
            cache,
            served_by: RwLock::new(HashMap::new()),
        }
    }

    /// Build the adapter chain from configuration
    ///
    /// Providers whose API key is absent are disabled and skipped here, so
    /// the chain falls straight through to the next priority.
    pub fn from_config(config: &MarketConfig) -> Self {
        let mut adapters: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

        for provider in &config.provider_priority {
            match provider {
                ProviderId::Yahoo => {
                    adapters.push(Arc::new(YahooAdapter::new()));
                }
                ProviderId::AlphaVantage => match &config.alpha_vantage_api_key {
                    Some(key) => adapters.push(Arc::new(AlphaVantageAdapter::new(
                        key,
                        config.alpha_vantage_rate_limit,
                    ))),
                    None => {
                        tracing::debug!(provider = %provider, "no API key, adapter disabled");
                    }
                },
                ProviderId::Finnhub => match &config.finnhub_api_key {
                    Some(key) => adapters
                        .push(Arc::new(FinnhubAdapter::new(key, config.finnhub_rate_limit))),
                    None => {
                        tracing::debug!(provider = %provider, "no API key, adapter disabled");
                    }
                },
            }
        }

        Self::new(adapters, SeriesCache::new(config.cache_ttl))
    }

    /// Fetch a symbol's series over `[start, end]`
    ///
    /// Always returns a non-empty result for a valid request; when every
    /// adapter fails the result is the sample series tagged
    /// `source_name = "sample"`.
    pub async fn fetch(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<FetchResult> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(MarketError::InvalidSymbol(symbol));
        }
        if start > end {
            return Err(MarketError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }

        let key = CacheKey::new(&symbol, start, end);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        for adapter in &self.adapters {
            let source = adapter.id().as_str();
            match adapter.fetch(&symbol, start, end).await {
                Ok(series) if series.is_empty() => {
                    tracing::warn!(provider = source, %symbol, "empty payload, trying next source");
                }
                Ok(series) => {
                    let result = FetchResult {
                        symbol: symbol.clone(),
                        series,
                        source_name: source.to_string(),
                        fetched_at: Utc::now(),
                    };
                    self.cache.put(key, result.clone()).await;
                    self.record_source(&symbol, source).await;
                    return Ok(result);
                }
                Err(err) => {
                    tracing::warn!(provider = source, %symbol, error = %err, "source failed, trying next");
                }
            }
        }

        // Chain exhausted: substitute sample data. Not cached, so real
        // providers get another chance on the next call.
        tracing::warn!(%symbol, "all sources failed, substituting sample data");
        let series = self.sample.series(&symbol, start, end);
        self.record_source(&symbol, SAMPLE_SOURCE_NAME).await;

        Ok(FetchResult {
            symbol: symbol.clone(),
            series,
            source_name: SAMPLE_SOURCE_NAME.to_string(),
            fetched_at: Utc::now(),
        })
    }

    /// Which source served this symbol last, if it was fetched this session
    pub async fn source_for(&self, symbol: &str) -> Option<String> {
        let served_by = self.served_by.read().await;
        served_by.get(&symbol.trim().to_uppercase()).cloned()
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    async fn record_source(&self, symbol: &str, source: &str) {
        let mut served_by = self.served_by.write().await;
        served_by.insert(symbol.to_string(), source.to_string());
    }
}
