//! Alert rules and the evaluator that fires events from analytics snapshots

use crate::analytics::SymbolSnapshot;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

/// Delivery channel for a fired alert
///
/// Delivery itself is an external collaborator; the evaluator only tags
/// events with the channel the rule asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertChannel {
    Console,
    Email,
}

/// Condition a rule checks against the latest snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    /// |last-bar percent change| exceeds the threshold
    DailyChangeAbs,
    /// |whole-period percent change| exceeds the threshold
    PeriodChangeAbs,
    /// Annualized volatility (percent) exceeds the threshold
    VolatilityAbove,
    /// Any significant move with |z| exceeding the threshold
    ZScoreAbs,
}

/// User-defined alert rule, created by configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: String,
    pub condition: AlertCondition,
    pub threshold: f64,
    pub channel: AlertChannel,
}

/// Fired alert; append-only, never mutated
#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub event_id: Uuid,
    pub rule_id: String,
    pub channel: AlertChannel,
    pub triggered_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

/// Checks rules against snapshots, with optional re-trigger suppression
///
/// Each rule is checked independently against the latest snapshot. A per
/// (rule, symbol) cooldown window suppresses re-fires; a zero cooldown
/// (the default) re-fires on every evaluation cycle.
pub struct AlertEvaluator {
    cooldown: Duration,
    last_fired: HashMap<(String, String), DateTime<Utc>>,
}

impl AlertEvaluator {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: HashMap::new(),
        }
    }

    /// Evaluate every rule against one snapshot, returning the fired events
    pub fn evaluate(&mut self, rules: &[AlertRule], snapshot: &SymbolSnapshot) -> Vec<AlertEvent> {
        let now = Utc::now();
        let mut events = Vec::new();

        for rule in rules {
            let Some(payload) = rule_payload(rule, snapshot) else {
                continue;
            };

            let key = (rule.id.clone(), snapshot.symbol.clone());
            if self.cooldown > Duration::zero() {
                if let Some(last) = self.last_fired.get(&key) {
                    if now - *last < self.cooldown {
                        tracing::debug!(
                            rule = %rule.id,
                            symbol = %snapshot.symbol,
                            "alert suppressed within cooldown window"
                        );
                        continue;
                    }
                }
            }
            self.last_fired.insert(key, now);

            events.push(AlertEvent {
                event_id: Uuid::new_v4(),
                rule_id: rule.id.clone(),
                channel: rule.channel,
                triggered_at: now,
                payload,
            });
        }

        events
    }
}

/// Stateless rule check: the event payload if the condition holds
fn rule_payload(rule: &AlertRule, snapshot: &SymbolSnapshot) -> Option<serde_json::Value> {
    let base = |observed: f64| {
        json!({
            "symbol": snapshot.symbol,
            "source": snapshot.source_name,
            "condition": rule.condition,
            "threshold": rule.threshold,
            "observed": observed,
            "latest_close": snapshot.latest_close,
        })
    };

    match rule.condition {
        AlertCondition::DailyChangeAbs => snapshot
            .daily_change_pct
            .filter(|c| c.abs() > rule.threshold)
            .map(base),
        AlertCondition::PeriodChangeAbs => snapshot
            .period_change_pct
            .filter(|c| c.abs() > rule.threshold)
            .map(base),
        AlertCondition::VolatilityAbove => snapshot
            .annualized_volatility_pct
            .filter(|v| *v > rule.threshold)
            .map(base),
        AlertCondition::ZScoreAbs => snapshot
            .significant_moves
            .iter()
            .map(|m| m.z_score)
            .max_by(|a, b| a.abs().total_cmp(&b.abs()))
            .filter(|z| z.abs() > rule.threshold)
            .map(base),
    }
}

/// Built-in rule set: large daily move, large period move, high volatility
pub fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule {
            id: "large-daily-move".to_string(),
            condition: AlertCondition::DailyChangeAbs,
            threshold: 5.0,
            channel: AlertChannel::Console,
        },
        AlertRule {
            id: "large-period-move".to_string(),
            condition: AlertCondition::PeriodChangeAbs,
            threshold: 15.0,
            channel: AlertChannel::Console,
        },
        AlertRule {
            id: "high-volatility".to_string(),
            condition: AlertCondition::VolatilityAbove,
            threshold: 40.0,
            channel: AlertChannel::Console,
        },
    ]
}
