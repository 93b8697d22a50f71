//! Tool evaluating the configured alert rules over a watchlist

use crate::alerts::AlertEvaluator;
use crate::analytics;
use crate::config::MarketConfig;
use crate::selector::SourceSelector;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sentinel_tools::{Result as ToolResult, Tool, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;

const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Fetches each watched symbol, snapshots it and runs the rule set
///
/// The evaluator's cooldown state lives across calls, so repeated
/// invocations within the configured cooldown stay quiet.
pub struct EvaluateAlertsTool {
    selector: Arc<SourceSelector>,
    config: Arc<MarketConfig>,
    evaluator: Mutex<AlertEvaluator>,
}

#[derive(Debug, Deserialize)]
struct EvaluateAlertsParams {
    symbols: Vec<String>,
    #[serde(default)]
    days: Option<i64>,
}

impl EvaluateAlertsTool {
    pub fn new(selector: Arc<SourceSelector>, config: Arc<MarketConfig>) -> Self {
        let evaluator = Mutex::new(AlertEvaluator::new(config.cooldown()));
        Self {
            selector,
            config,
            evaluator,
        }
    }
}

#[async_trait]
impl Tool for EvaluateAlertsTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: EvaluateAlertsParams = serde_json::from_value(params)?;
        if params.symbols.is_empty() {
            return Err(ToolError::InvalidParams(
                "symbols must name at least one ticker".to_string(),
            ));
        }
        let days = params.days.unwrap_or(DEFAULT_LOOKBACK_DAYS).max(1);

        let end = Utc::now();
        let start = end - Duration::days(days);

        let mut events = Vec::new();
        let mut checked = 0usize;

        for symbol in &params.symbols {
            let result = self
                .selector
                .fetch(symbol, start, end)
                .await
                .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

            let Some(snapshot) = analytics::snapshot(
                &result,
                self.config.significance_window,
                self.config.significance_threshold,
            ) else {
                continue;
            };
            checked += 1;

            let mut evaluator = self.evaluator.lock().await;
            for event in evaluator.evaluate(&self.config.alert_rules, &snapshot) {
                events.push(json!({
                    "event_id": event.event_id,
                    "rule_id": event.rule_id,
                    "channel": event.channel,
                    "triggered_at": event.triggered_at.to_rfc3339(),
                    "payload": event.payload,
                }));
            }
        }

        Ok(json!({
            "symbols_checked": checked,
            "rules": self.config.alert_rules.len(),
            "fired": events.len(),
            "events": events,
        }))
    }

    fn name(&self) -> &str {
        "evaluate_alerts"
    }

    fn description(&self) -> &str {
        "Evaluate the configured alert rules against fresh market snapshots for a \
         list of symbols. Returns the alert events that fired this cycle."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbols": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Stock ticker symbols to check"
                },
                "days": {
                    "type": "integer",
                    "description": "Look-back window in calendar days",
                    "default": DEFAULT_LOOKBACK_DAYS
                }
            },
            "required": ["symbols"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertChannel, AlertCondition, AlertRule};
    use crate::cache::SeriesCache;
    use std::time::Duration as StdDuration;

    fn tool_with_rules(rules: Vec<AlertRule>) -> EvaluateAlertsTool {
        let selector = Arc::new(SourceSelector::new(
            Vec::new(),
            SeriesCache::new(StdDuration::from_secs(60)),
        ));
        let config = MarketConfig {
            alert_rules: rules,
            ..MarketConfig::default()
        };
        EvaluateAlertsTool::new(selector, Arc::new(config))
    }

    #[test]
    fn tool_metadata() {
        let tool = tool_with_rules(Vec::new());
        assert_eq!(tool.name(), "evaluate_alerts");
        assert!(!tool.description().is_empty());
        assert_eq!(tool.input_schema()["properties"]["symbols"]["type"], "array");
    }

    #[tokio::test]
    async fn empty_watchlist_rejected() {
        let tool = tool_with_rules(Vec::new());
        let err = tool.execute(json!({ "symbols": [] })).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn impossible_rule_fires_nothing() {
        let rules = vec![AlertRule {
            id: "never".to_string(),
            condition: AlertCondition::VolatilityAbove,
            threshold: 1e9,
            channel: AlertChannel::Console,
        }];
        let tool = tool_with_rules(rules);

        let out = tool
            .execute(json!({ "symbols": ["NVDA"], "days": 60 }))
            .await
            .unwrap();

        assert_eq!(out["symbols_checked"], 1);
        assert_eq!(out["fired"], 0);
    }

    #[tokio::test]
    async fn trivial_rule_fires_per_symbol() {
        // Sample data always has some volatility, so a zero threshold fires
        let rules = vec![AlertRule {
            id: "always".to_string(),
            condition: AlertCondition::VolatilityAbove,
            threshold: 0.0,
            channel: AlertChannel::Console,
        }];
        let tool = tool_with_rules(rules);

        let out = tool
            .execute(json!({ "symbols": ["NVDA", "MSFT"], "days": 60 }))
            .await
            .unwrap();

        assert_eq!(out["symbols_checked"], 2);
        assert_eq!(out["fired"], 2);
        assert_eq!(out["events"][0]["rule_id"], "always");
    }
}
