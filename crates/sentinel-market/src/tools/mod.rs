//! Market tools exposed over the agent tool seam

pub mod evaluate_alerts;
pub mod market_analytics;
pub mod price_series;

pub use evaluate_alerts::EvaluateAlertsTool;
pub use market_analytics::MarketAnalyticsTool;
pub use price_series::PriceSeriesTool;

use crate::config::MarketConfig;
use crate::selector::SourceSelector;
use sentinel_tools::ToolRegistry;
use std::sync::Arc;

/// Register the full market tool set into a registry
pub fn register_market_tools(
    registry: &mut ToolRegistry,
    selector: Arc<SourceSelector>,
    config: Arc<MarketConfig>,
) {
    registry.register(Arc::new(PriceSeriesTool::new(Arc::clone(&selector))));
    registry.register(Arc::new(MarketAnalyticsTool::new(
        Arc::clone(&selector),
        Arc::clone(&config),
    )));
    registry.register(Arc::new(EvaluateAlertsTool::new(selector, config)));
}
