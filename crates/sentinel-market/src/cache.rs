//! TTL cache for fetched price series, avoiding redundant provider calls

use crate::series::FetchResult;
use cached::{Cached, TimedCache};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key: one symbol over one requested window
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub symbol: String,
    pub range: String,
}

impl CacheKey {
    /// Key for a symbol and a date window
    pub fn new(symbol: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            range: format!("{}..{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d")),
        }
    }
}

/// Thread-safe TTL cache for fetch results
///
/// Expired entries are evicted lazily on the next lookup; there is no
/// background sweep and no capacity bound (acceptable for a single session).
/// Owned by the source selector with an explicit lifecycle, not module
/// state.
pub struct SeriesCache {
    cache: Arc<RwLock<TimedCache<CacheKey, FetchResult>>>,
}

impl SeriesCache {
    /// Create a new cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a fetch result; absent if missing or past its TTL
    pub async fn get(&self, key: &CacheKey) -> Option<FetchResult> {
        let mut cache = self.cache.write().await;
        let hit = cache.cache_get(key).cloned();
        tracing::debug!(symbol = %key.symbol, range = %key.range, hit = hit.is_some(), "cache lookup");
        hit
    }

    /// Insert a fetch result
    pub async fn put(&self, key: CacheKey, result: FetchResult) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, result);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Number of cached entries (including not-yet-evicted expired ones)
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for SeriesCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::PriceSeries;
    use chrono::TimeZone;

    fn key() -> CacheKey {
        CacheKey::new(
            "NVDA",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
        )
    }

    fn result() -> FetchResult {
        FetchResult {
            symbol: "NVDA".to_string(),
            series: PriceSeries::new("NVDA", Vec::new()),
            source_name: "stub".to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn key_formats_date_window() {
        let key = key();
        assert_eq!(key.symbol, "NVDA");
        assert_eq!(key.range, "2024-01-01..2024-01-31");
    }

    #[tokio::test]
    async fn get_after_put_returns_same_result() {
        let cache = SeriesCache::new(Duration::from_secs(60));
        cache.put(key(), result()).await;

        let hit = cache.get(&key()).await.expect("entry should be cached");
        assert_eq!(hit.symbol, "NVDA");
        assert_eq!(hit.source_name, "stub");
    }

    #[tokio::test]
    async fn get_missing_key_is_absent() {
        let cache = SeriesCache::new(Duration::from_secs(60));
        assert!(cache.get(&key()).await.is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_absent() {
        let cache = SeriesCache::new(Duration::from_millis(20));
        cache.put(key(), result()).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get(&key()).await.is_none());
    }

    #[tokio::test]
    async fn clear_empties_cache() {
        let cache = SeriesCache::new(Duration::from_secs(60));
        cache.put(key(), result()).await;
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
