//! Market data retrieval, analytics and alerting
//!
//! This crate fetches daily price series through a prioritized chain of
//! provider adapters, computes statistical analytics over them and evaluates
//! user-defined alert rules. It includes:
//!
//! - Provider adapters (Yahoo Finance, Alpha Vantage, Finnhub) behind one
//!   async trait, with a deterministic sample-data fallback
//! - A source selector that tries adapters in priority order and never
//!   leaves the caller without data
//! - A TTL cache keyed by symbol and date window
//! - Analytics: moving averages, RSI, Bollinger bands, z-score move
//!   detection, correlation, beta and historical value at risk
//! - An alert evaluator firing events from per-symbol snapshots
//! - Agent tools exposing the above over the `sentinel-tools` seam
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_market::analytics;
//! use sentinel_market::config::MarketConfig;
//! use sentinel_market::selector::SourceSelector;
//! use chrono::{Duration, Utc};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MarketConfig::default().with_env_keys();
//!     let selector = SourceSelector::from_config(&config);
//!
//!     let end = Utc::now();
//!     let result = selector.fetch("NVDA", end - Duration::days(90), end).await?;
//!     println!("served by {}", result.source_name);
//!
//!     if let Some(snap) = analytics::snapshot(&result, 20, 2.0) {
//!         println!("{}: {:.2}", snap.symbol, snap.latest_close);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod alerts;
pub mod analytics;
pub mod cache;
pub mod config;
pub mod error;
pub mod selector;
pub mod series;
pub mod tools;

// Re-export main types for convenience
pub use adapters::{ProviderAdapter, ProviderId, SAMPLE_SOURCE_NAME};
pub use alerts::{AlertChannel, AlertCondition, AlertEvaluator, AlertEvent, AlertRule};
pub use analytics::SymbolSnapshot;
pub use cache::{CacheKey, SeriesCache};
pub use config::{AlertOptions, MarketConfig};
pub use error::{MarketError, Result};
pub use selector::SourceSelector;
pub use series::{FetchResult, PriceBar, PriceSeries};
pub use tools::{EvaluateAlertsTool, MarketAnalyticsTool, PriceSeriesTool, register_market_tools};
