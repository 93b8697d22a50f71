//! Configuration for market data retrieval, analytics and alerting

use crate::adapters::ProviderId;
use crate::alerts::AlertRule;
use crate::analytics::{
    DEFAULT_SIGNIFICANCE_THRESHOLD, DEFAULT_SIGNIFICANCE_WINDOW, DEFAULT_VAR_CONFIDENCE,
    DEFAULT_VAR_MIN_SAMPLES,
};
use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Alert delivery options bundle
///
/// Mirrors the recognized configuration keys: poll cadence plus per-channel
/// notification settings. Delivery itself is an external collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertOptions {
    /// Poll cadence of the monitor loop
    pub monitor_interval_seconds: u64,
    pub notifications: NotificationOptions,
    /// Suppression window for repeated triggers of the same (rule, symbol);
    /// zero re-fires every poll cycle
    pub cooldown_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationOptions {
    pub console: bool,
    pub email: EmailOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailOptions {
    pub enabled: bool,
    pub smtp_server: Option<String>,
    pub smtp_port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            monitor_interval_seconds: 300,
            notifications: NotificationOptions::default(),
            cooldown_seconds: 0,
        }
    }
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self {
            console: true,
            email: EmailOptions::default(),
        }
    }
}

/// Configuration for the market data pipeline
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Adapter priority: tried in order until one succeeds
    pub provider_priority: Vec<ProviderId>,

    /// Alpha Vantage API key; absence disables that adapter
    pub alpha_vantage_api_key: Option<String>,

    /// Finnhub API key; absence disables that adapter
    pub finnhub_api_key: Option<String>,

    /// Alpha Vantage requests per minute (free tier: 5)
    pub alpha_vantage_rate_limit: u32,

    /// Finnhub requests per minute (free tier: 60)
    pub finnhub_rate_limit: u32,

    /// TTL for cached price series
    pub cache_ttl: Duration,

    /// Trailing window for z-score significance
    pub significance_window: usize,

    /// |z| threshold flagging a significant move
    pub significance_threshold: f64,

    /// Confidence level for historical VaR
    pub var_confidence: f64,

    /// Minimum return sample below which VaR is "insufficient data"
    pub var_min_samples: usize,

    /// Alert rules evaluated each cycle
    pub alert_rules: Vec<AlertRule>,

    /// Alert delivery options
    pub alerts: AlertOptions,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            provider_priority: vec![
                ProviderId::Yahoo,
                ProviderId::AlphaVantage,
                ProviderId::Finnhub,
            ],
            alpha_vantage_api_key: None,
            finnhub_api_key: None,
            alpha_vantage_rate_limit: 5,
            finnhub_rate_limit: 60,
            cache_ttl: Duration::from_secs(300),
            significance_window: DEFAULT_SIGNIFICANCE_WINDOW,
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
            var_confidence: DEFAULT_VAR_CONFIDENCE,
            var_min_samples: DEFAULT_VAR_MIN_SAMPLES,
            alert_rules: crate::alerts::default_rules(),
            alerts: AlertOptions::default(),
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Load provider API keys from the environment
    ///
    /// Reads `ALPHA_VANTAGE_API_KEY` and `FINNHUB_API_KEY`; an unset
    /// variable leaves that adapter disabled.
    pub fn with_env_keys(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
            self.finnhub_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.provider_priority.is_empty() {
            return Err(MarketError::Config(
                "provider_priority must name at least one provider".to_string(),
            ));
        }
        if self.significance_window == 0 {
            return Err(MarketError::Config(
                "significance_window must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&(1.0 - self.var_confidence)) {
            return Err(MarketError::Config(
                "var_confidence must be in (0, 1]".to_string(),
            ));
        }
        if self.alerts.notifications.email.enabled
            && self.alerts.notifications.email.smtp_server.is_none()
        {
            return Err(MarketError::Config(
                "email notifications require smtp_server".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.alerts.cooldown_seconds as i64)
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    provider_priority: Option<Vec<ProviderId>>,
    alpha_vantage_api_key: Option<String>,
    finnhub_api_key: Option<String>,
    cache_ttl: Option<Duration>,
    significance_window: Option<usize>,
    significance_threshold: Option<f64>,
    var_confidence: Option<f64>,
    var_min_samples: Option<usize>,
    alert_rules: Option<Vec<AlertRule>>,
    alerts: Option<AlertOptions>,
}

impl MarketConfigBuilder {
    /// Set the adapter priority order
    pub fn provider_priority(mut self, priority: Vec<ProviderId>) -> Self {
        self.provider_priority = Some(priority);
        self
    }

    /// Set the Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set the Finnhub API key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Set the cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set the significance window
    pub fn significance_window(mut self, window: usize) -> Self {
        self.significance_window = Some(window);
        self
    }

    /// Set the significance threshold
    pub fn significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = Some(threshold);
        self
    }

    /// Set the VaR confidence level
    pub fn var_confidence(mut self, confidence: f64) -> Self {
        self.var_confidence = Some(confidence);
        self
    }

    /// Set the VaR minimum sample size
    pub fn var_min_samples(mut self, min_samples: usize) -> Self {
        self.var_min_samples = Some(min_samples);
        self
    }

    /// Set the alert rules
    pub fn alert_rules(mut self, rules: Vec<AlertRule>) -> Self {
        self.alert_rules = Some(rules);
        self
    }

    /// Set the alert delivery options
    pub fn alerts(mut self, options: AlertOptions) -> Self {
        self.alerts = Some(options);
        self
    }

    /// Load provider API keys from the environment
    pub fn with_env_keys(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
            self.finnhub_api_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            provider_priority: self.provider_priority.unwrap_or(defaults.provider_priority),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            finnhub_api_key: self.finnhub_api_key,
            alpha_vantage_rate_limit: defaults.alpha_vantage_rate_limit,
            finnhub_rate_limit: defaults.finnhub_rate_limit,
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            significance_window: self
                .significance_window
                .unwrap_or(defaults.significance_window),
            significance_threshold: self
                .significance_threshold
                .unwrap_or(defaults.significance_threshold),
            var_confidence: self.var_confidence.unwrap_or(defaults.var_confidence),
            var_min_samples: self.var_min_samples.unwrap_or(defaults.var_min_samples),
            alert_rules: self.alert_rules.unwrap_or(defaults.alert_rules),
            alerts: self.alerts.unwrap_or(defaults.alerts),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MarketConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider_priority[0], ProviderId::Yahoo);
        assert_eq!(config.significance_threshold, 2.0);
    }

    #[test]
    fn builder_overrides() {
        let config = MarketConfig::builder()
            .provider_priority(vec![ProviderId::AlphaVantage])
            .alpha_vantage_api_key("test_key")
            .significance_threshold(3.0)
            .cache_ttl(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.provider_priority, vec![ProviderId::AlphaVantage]);
        assert_eq!(config.alpha_vantage_api_key.as_deref(), Some("test_key"));
        assert_eq!(config.significance_threshold, 3.0);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn empty_priority_rejected() {
        let result = MarketConfig::builder().provider_priority(vec![]).build();
        assert!(result.is_err());
    }

    #[test]
    fn email_without_smtp_rejected() {
        let mut options = AlertOptions::default();
        options.notifications.email.enabled = true;

        let result = MarketConfig::builder().alerts(options).build();
        assert!(result.is_err());
    }

    #[test]
    fn alert_options_deserialize_nested_keys() {
        let options: AlertOptions = serde_json::from_value(serde_json::json!({
            "monitor_interval_seconds": 60,
            "notifications": {
                "console": true,
                "email": {
                    "enabled": false,
                    "smtp_server": "smtp.example.com",
                    "smtp_port": 587
                }
            }
        }))
        .unwrap();

        assert_eq!(options.monitor_interval_seconds, 60);
        assert!(options.notifications.console);
        assert_eq!(
            options.notifications.email.smtp_server.as_deref(),
            Some("smtp.example.com")
        );
        assert_eq!(options.cooldown_seconds, 0);
    }
}
