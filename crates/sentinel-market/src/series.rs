//! Normalized price series shared by every provider adapter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trading bar for one symbol; immutable once fetched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Ordered bars for one symbol, ascending by timestamp, no duplicates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from raw provider bars
    ///
    /// Bars are sorted ascending by timestamp; for duplicate timestamps the
    /// last bar wins (providers occasionally repeat the current session bar).
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.reverse();
        bars.dedup_by_key(|b| b.timestamp);
        bars.reverse();

        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Closing prices in timestamp order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Simple close-to-close returns; empty for series shorter than 2 bars
    pub fn returns(&self) -> Vec<f64> {
        self.bars
            .windows(2)
            .filter(|w| w[0].close != 0.0)
            .map(|w| (w[1].close - w[0].close) / w[0].close)
            .collect()
    }
}

/// Result of one resolved fetch, tagged with the source that served it
///
/// `source_name` is `"sample"` when every real provider failed and the
/// bundled synthetic series was substituted; consumers use it to tell real
/// data from synthetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub symbol: String,
    pub series: PriceSeries,
    pub source_name: String,
    pub fetched_at: DateTime<Utc>,
}

impl FetchResult {
    pub fn is_sample(&self) -> bool {
        self.source_name == crate::adapters::SAMPLE_SOURCE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn series_sorts_ascending() {
        let series = PriceSeries::new("TEST", vec![bar(3, 30.0), bar(1, 10.0), bar(2, 20.0)]);
        let closes = series.closes();
        assert_eq!(closes, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn series_dedupes_timestamps_keeping_last() {
        let mut late = bar(2, 21.0);
        late.volume = 2000;
        let series = PriceSeries::new("TEST", vec![bar(1, 10.0), bar(2, 20.0), late]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[1].close, 21.0);
        assert_eq!(series.bars()[1].volume, 2000);
    }

    #[test]
    fn returns_over_closes() {
        let series = PriceSeries::new("TEST", vec![bar(1, 100.0), bar(2, 110.0), bar(3, 99.0)]);
        let returns = series.returns();

        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.10).abs() < 1e-12);
        assert!((returns[1] - (-0.10)).abs() < 1e-12);
    }

    #[test]
    fn returns_empty_for_short_series() {
        let series = PriceSeries::new("TEST", vec![bar(1, 100.0)]);
        assert!(series.returns().is_empty());
    }
}
