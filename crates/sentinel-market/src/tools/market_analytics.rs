//! Tool computing the statistical overview for a symbol

use crate::analytics::{
    self, DEFAULT_BOLLINGER_K, DEFAULT_BOLLINGER_WINDOW, DEFAULT_RSI_PERIOD, beta, bollinger,
    correlation, ema, rsi, sma, value_at_risk,
};
use crate::config::MarketConfig;
use crate::selector::SourceSelector;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sentinel_tools::{Result as ToolResult, Tool, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const DEFAULT_LOOKBACK_DAYS: i64 = 90;
const DEFAULT_MA_WINDOW: usize = 20;

/// Runs the analytics suite over a fetched series
///
/// Indicators that cannot be computed from the available history come back
/// as JSON nulls rather than errors, so a thin series still yields a
/// partial report.
pub struct MarketAnalyticsTool {
    selector: Arc<SourceSelector>,
    config: Arc<MarketConfig>,
}

#[derive(Debug, Deserialize)]
struct MarketAnalyticsParams {
    symbol: String,
    #[serde(default)]
    days: Option<i64>,
    /// Optional benchmark symbol for correlation and beta
    #[serde(default)]
    benchmark: Option<String>,
    #[serde(default)]
    ma_window: Option<usize>,
}

impl MarketAnalyticsTool {
    pub fn new(selector: Arc<SourceSelector>, config: Arc<MarketConfig>) -> Self {
        Self { selector, config }
    }
}

fn last_defined<T: Clone>(values: &[Option<T>]) -> Option<T> {
    values.iter().rev().find_map(Clone::clone)
}

#[async_trait]
impl Tool for MarketAnalyticsTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: MarketAnalyticsParams = serde_json::from_value(params)?;
        let days = params.days.unwrap_or(DEFAULT_LOOKBACK_DAYS).max(1);
        let ma_window = params.ma_window.unwrap_or(DEFAULT_MA_WINDOW).max(1);

        let end = Utc::now();
        let start = end - Duration::days(days);

        let result = self
            .selector
            .fetch(&params.symbol, start, end)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let snapshot = analytics::snapshot(
            &result,
            self.config.significance_window,
            self.config.significance_threshold,
        )
        .ok_or_else(|| {
            ToolError::ExecutionFailed(format!("no data available for {}", result.symbol))
        })?;

        let closes = result.series.closes();
        let returns = result.series.returns();

        let band = last_defined(&bollinger(
            &closes,
            DEFAULT_BOLLINGER_WINDOW,
            DEFAULT_BOLLINGER_K,
        ));

        let mut report = json!({
            "symbol": snapshot.symbol,
            "source": snapshot.source_name,
            "is_sample": result.is_sample(),
            "as_of": snapshot.as_of.to_rfc3339(),
            "latest_close": snapshot.latest_close,
            "daily_change_pct": snapshot.daily_change_pct,
            "period_change_pct": snapshot.period_change_pct,
            "annualized_volatility_pct": snapshot.annualized_volatility_pct,
            "mean_daily_return_pct": snapshot.mean_daily_return_pct,
            "sma": last_defined(&sma(&closes, ma_window)),
            "ema": last_defined(&ema(&closes, ma_window)),
            "ma_window": ma_window,
            "rsi": last_defined(&rsi(&closes, DEFAULT_RSI_PERIOD)),
            "bollinger": band.map(|b| json!({
                "upper": b.upper,
                "middle": b.middle,
                "lower": b.lower,
            })),
            "value_at_risk": value_at_risk(
                &returns,
                self.config.var_confidence,
                self.config.var_min_samples,
            ),
            "var_confidence": self.config.var_confidence,
            "significant_moves": snapshot.significant_moves.iter().map(|m| json!({
                "timestamp": m.timestamp.to_rfc3339(),
                "z_score": m.z_score,
                "direction": m.direction,
            })).collect::<Vec<_>>(),
        });

        if let Some(benchmark) = &params.benchmark {
            let bench = self
                .selector
                .fetch(benchmark, start, end)
                .await
                .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

            report["benchmark"] = json!({
                "symbol": bench.symbol,
                "source": bench.source_name,
                "correlation": correlation(&result.series, &bench.series),
                "beta": beta(&result.series, &bench.series),
            });
        }

        Ok(report)
    }

    fn name(&self) -> &str {
        "market_analytics"
    }

    fn description(&self) -> &str {
        "Compute a statistical overview for a stock symbol: moving averages, RSI, \
         Bollinger bands, volatility, value at risk and significant daily moves. \
         Optionally reports correlation and beta against a benchmark symbol."
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
                },
                "benchmark": {
                    "type": "string",
                    "description": "Benchmark symbol for correlation and beta (e.g., 'SPY')"
                },
                "ma_window": {
                    "type": "integer",
                    "description": "Window for the moving averages",
                    "default": DEFAULT_MA_WINDOW
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

    fn tool() -> MarketAnalyticsTool {
        // Empty chain serves deterministic sample data, no network needed
        let selector = Arc::new(SourceSelector::new(
            Vec::new(),
            SeriesCache::new(StdDuration::from_secs(60)),
        ));
        MarketAnalyticsTool::new(selector, Arc::new(MarketConfig::default()))
    }

    #[test]
    fn tool_metadata() {
        let tool = tool();
        assert_eq!(tool.name(), "market_analytics");
        assert!(!tool.description().is_empty());

        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["benchmark"].is_object());
    }

    #[tokio::test]
    async fn execute_reports_overview() {
        let out = tool()
            .execute(json!({ "symbol": "NVDA", "days": 120 }))
            .await
            .unwrap();

        assert_eq!(out["symbol"], "NVDA");
        assert_eq!(out["source"], "sample");
        assert!(out["latest_close"].is_number());
        assert!(out["sma"].is_number());
        assert!(out["rsi"].is_number());
        assert!(out["bollinger"]["middle"].is_number());
        assert!(out["annualized_volatility_pct"].is_number());
    }

    #[tokio::test]
    async fn thin_series_reports_nulls_not_errors() {
        // 3 calendar days cannot warm up a 20-bar window or a VaR sample
        let out = tool()
            .execute(json!({ "symbol": "NVDA", "days": 3 }))
            .await
            .unwrap();

        assert!(out["sma"].is_null());
        assert!(out["rsi"].is_null());
        assert!(out["value_at_risk"].is_null());
    }

    #[tokio::test]
    async fn benchmark_adds_relation_block() {
        let out = tool()
            .execute(json!({ "symbol": "NVDA", "days": 120, "benchmark": "MSFT" }))
            .await
            .unwrap();

        assert_eq!(out["benchmark"]["symbol"], "MSFT");
        assert!(out["benchmark"]["correlation"].is_number());
        assert!(out["benchmark"]["beta"].is_number());
    }

    #[tokio::test]
    async fn self_benchmark_is_perfectly_correlated() {
        let out = tool()
            .execute(json!({ "symbol": "NVDA", "days": 120, "benchmark": "NVDA" }))
            .await
            .unwrap();

        let corr = out["benchmark"]["correlation"].as_f64().unwrap();
        let beta = out["benchmark"]["beta"].as_f64().unwrap();
        assert!((corr - 1.0).abs() < 1e-9);
        assert!((beta - 1.0).abs() < 1e-9);
    }
}
