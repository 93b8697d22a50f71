//! Statistical analytics over normalized price series
//!
//! Every operation is a pure function of a `PriceSeries` with no hidden
//! state. Values that cannot be computed (warmup bars, flat windows, thin
//! samples) are reported as `None`, never as an error or a zero.

pub mod bollinger;
pub mod moving;
pub mod relation;
pub mod rsi;
pub mod significance;
pub mod var;

pub use bollinger::{Band, DEFAULT_BOLLINGER_K, DEFAULT_BOLLINGER_WINDOW, bollinger};
pub use moving::{ema, sma};
pub use relation::{align, beta, correlation};
pub use rsi::{DEFAULT_RSI_PERIOD, rsi};
pub use significance::{
    DEFAULT_SIGNIFICANCE_THRESHOLD, DEFAULT_SIGNIFICANCE_WINDOW, Direction, SignificantMove,
    significant_moves, zscores,
};
pub use var::{DEFAULT_VAR_CONFIDENCE, DEFAULT_VAR_MIN_SAMPLES, value_at_risk};

use crate::series::FetchResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Trading days per year, for annualizing daily volatility
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Summary statistics for one symbol, the unit the alert evaluator consumes
#[derive(Debug, Clone, Serialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub source_name: String,
    pub as_of: DateTime<Utc>,
    pub latest_close: f64,
    /// Last-bar percent change; absent with fewer than 2 bars
    pub daily_change_pct: Option<f64>,
    /// Whole-period percent change; absent with fewer than 2 bars
    pub period_change_pct: Option<f64>,
    /// Annualized volatility in percent (sample std of daily returns * sqrt(252))
    pub annualized_volatility_pct: Option<f64>,
    /// Mean daily return in percent
    pub mean_daily_return_pct: Option<f64>,
    pub significant_moves: Vec<SignificantMove>,
}

/// Build a snapshot from a fetch result; `None` for an empty series
pub fn snapshot(
    result: &FetchResult,
    significance_window: usize,
    significance_threshold: f64,
) -> Option<SymbolSnapshot> {
    let series = &result.series;
    let last = series.last()?;
    let bars = series.bars();

    let daily_change_pct = bars
        .len()
        .checked_sub(2)
        .and_then(|i| bars.get(i))
        .filter(|prev| prev.close != 0.0)
        .map(|prev| (last.close - prev.close) / prev.close * 100.0);

    let period_change_pct = match series.first() {
        Some(first) if bars.len() >= 2 && first.close != 0.0 => {
            Some((last.close - first.close) / first.close * 100.0)
        }
        _ => None,
    };

    let returns = series.returns();
    let mean_daily_return_pct = if returns.is_empty() {
        None
    } else {
        Some(returns.iter().sum::<f64>() / returns.len() as f64 * 100.0)
    };
    let annualized_volatility_pct =
        sample_std(&returns).map(|std| std * TRADING_DAYS_PER_YEAR.sqrt() * 100.0);

    Some(SymbolSnapshot {
        symbol: result.symbol.clone(),
        source_name: result.source_name.clone(),
        as_of: last.timestamp,
        latest_close: last.close,
        daily_change_pct,
        period_change_pct,
        annualized_volatility_pct,
        mean_daily_return_pct,
        significant_moves: significant_moves(series, significance_window, significance_threshold),
    })
}

/// Sample standard deviation (n - 1); `None` below 2 observations
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
