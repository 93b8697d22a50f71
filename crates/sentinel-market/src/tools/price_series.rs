//! Tool for fetching a symbol's daily price series

use crate::selector::SourceSelector;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sentinel_tools::{Result as ToolResult, Tool, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Fetches daily bars through the source chain
pub struct PriceSeriesTool {
    selector: Arc<SourceSelector>,
}

#[derive(Debug, Deserialize)]
struct PriceSeriesParams {
    symbol: String,
    #[serde(default)]
    days: Option<i64>,
}

impl PriceSeriesTool {
    pub fn new(selector: Arc<SourceSelector>) -> Self {
        Self { selector }
    }
}

#[async_trait]
impl Tool for PriceSeriesTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: PriceSeriesParams = serde_json::from_value(params)?;
        let days = params.days.unwrap_or(DEFAULT_LOOKBACK_DAYS).max(1);

        let end = Utc::now();
        let start = end - Duration::days(days);

        let result = self
            .selector
            .fetch(&params.symbol, start, end)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let bars: Vec<Value> = result
            .series
            .bars()
            .iter()
            .map(|bar| {
                json!({
                    "timestamp": bar.timestamp.to_rfc3339(),
                    "open": bar.open,
                    "high": bar.high,
                    "low": bar.low,
                    "close": bar.close,
                    "volume": bar.volume,
                })
            })
            .collect();

        Ok(json!({
            "symbol": result.symbol,
            "source": result.source_name,
            "is_sample": result.is_sample(),
            "fetched_at": result.fetched_at.to_rfc3339(),
            "data_points": bars.len(),
            "bars": bars,
        }))
    }

    fn name(&self) -> &str {
        "price_series"
    }

    fn description(&self) -> &str {
        "Fetch daily price bars for a stock symbol over a look-back window. \
         Falls back through the configured data sources and reports which one served the data."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'NVDA', 'MSFT')"
                },
                "days": {
                    "type": "integer",
                    "description": "Look-back window in calendar days",
                    "default": DEFAULT_LOOKBACK_DAYS
                }
            },
            "required": ["symbol"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SeriesCache;
    use std::time::Duration as StdDuration;

    fn tool() -> PriceSeriesTool {
        // An empty adapter chain always serves the deterministic sample
        // series, so these tests run offline.
        let selector = Arc::new(SourceSelector::new(
            Vec::new(),
            SeriesCache::new(StdDuration::from_secs(60)),
        ));
        PriceSeriesTool::new(selector)
    }

    #[test]
    fn tool_metadata() {
        let tool = tool();
        assert_eq!(tool.name(), "price_series");
        assert!(!tool.description().is_empty());

        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["symbol"].is_object());
    }

    #[tokio::test]
    async fn execute_returns_bars() {
        let out = tool()
            .execute(json!({ "symbol": "NVDA", "days": 30 }))
            .await
            .unwrap();

        assert_eq!(out["symbol"], "NVDA");
        assert_eq!(out["source"], "sample");
        assert_eq!(out["is_sample"], true);
        assert!(out["data_points"].as_u64().unwrap() > 0);
        assert!(out["bars"][0]["close"].is_number());
    }

    #[tokio::test]
    async fn execute_rejects_missing_symbol() {
        let err = tool().execute(json!({ "days": 30 })).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn execute_rejects_blank_symbol() {
        let err = tool().execute(json!({ "symbol": "  " })).await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }
}
