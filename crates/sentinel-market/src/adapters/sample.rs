//! Bundled sample data, the terminal fallback of the source chain
//!
//! When every real provider fails the selector substitutes a deterministic
//! per-symbol random walk: seeded by the symbol so repeated fetches agree,
//! business days only, 2.5% daily volatility. Results built from it carry
//! `source_name = "sample"` so consumers can tell it from real data.

use crate::series::{PriceBar, PriceSeries};
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const DAILY_VOLATILITY: f64 = 0.025;
const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Realistic starting prices for the tracked AI tickers
const BASE_PRICES: &[(&str, f64)] = &[
    ("NVDA", 450.0),
    ("MSFT", 380.0),
    ("GOOGL", 140.0),
    ("AMZN", 150.0),
    ("META", 320.0),
    ("AMD", 140.0),
    ("PLTR", 25.0),
    ("SNOW", 180.0),
    ("CRM", 220.0),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct SampleData;

impl SampleData {
    pub fn new() -> Self {
        Self
    }

    /// Generate the synthetic series for a symbol over a window
    ///
    /// Always non-empty for a non-inverted window: at minimum the window's
    /// last business day is emitted.
    pub fn series(&self, symbol: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(symbol_seed(symbol));
        let step = Normal::new(0.0, DAILY_VOLATILITY).expect("volatility is finite and positive");

        let mut price = base_price(symbol);
        let mut bars = Vec::new();
        let mut day = start.date_naive();
        let last = end.date_naive().max(day);

        while day <= last {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                let open = price;
                price *= 1.0 + step.sample(&mut rng);
                let close = price;
                let spread = close.abs() * rng.gen_range(0.0..0.01);

                bars.push(PriceBar {
                    timestamp: day.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc(),
                    open,
                    high: open.max(close) + spread,
                    low: open.min(close) - spread,
                    close,
                    volume: rng.gen_range(1_000_000..20_000_000),
                });
            }
            day += Duration::days(1);
        }

        if bars.is_empty() {
            // Window fell entirely on a weekend: emit one bar anyway so the
            // fallback never returns an empty series.
            bars.push(PriceBar {
                timestamp: last.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc(),
                open: price,
                high: price,
                low: price,
                close: price,
                volume: 1_000_000,
            });
        }

        PriceSeries::new(symbol, bars)
    }
}

fn symbol_seed(symbol: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    symbol.hash(&mut hasher);
    hasher.finish()
}

fn base_price(symbol: &str) -> f64 {
    BASE_PRICES
        .iter()
        .find(|(ticker, _)| *ticker == symbol)
        .map_or(DEFAULT_BASE_PRICE, |(_, price)| *price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn series_is_never_empty() {
        let (start, end) = window();
        let series = SampleData::new().series("NVDA", start, end);
        assert!(!series.is_empty());
    }

    #[test]
    fn weekend_only_window_still_yields_a_bar() {
        // 2024-01-06/07 is a Saturday/Sunday pair
        let start = Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();

        let series = SampleData::new().series("NVDA", start, end);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn same_symbol_is_deterministic() {
        let (start, end) = window();
        let sample = SampleData::new();

        let a = sample.series("NVDA", start, end);
        let b = sample.series("NVDA", start, end);
        assert_eq!(a, b);
    }

    #[test]
    fn different_symbols_diverge() {
        let (start, end) = window();
        let sample = SampleData::new();

        let a = sample.series("NVDA", start, end);
        let b = sample.series("MSFT", start, end);
        assert_ne!(a.closes(), b.closes());
    }

    #[test]
    fn skips_weekends() {
        let (start, end) = window();
        let series = SampleData::new().series("NVDA", start, end);

        for bar in series.bars() {
            let weekday = bar.timestamp.date_naive().weekday();
            assert!(!matches!(weekday, Weekday::Sat | Weekday::Sun));
        }
        // January 2024 has 23 business days
        assert_eq!(series.len(), 23);
    }

    #[test]
    fn known_ticker_starts_near_base_price() {
        let (start, end) = window();
        let series = SampleData::new().series("NVDA", start, end);

        let first_open = series.first().unwrap().open;
        assert!((first_open - 450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bars_are_coherent() {
        let (start, end) = window();
        let series = SampleData::new().series("PLTR", start, end);

        for bar in series.bars() {
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
            assert!(bar.close > 0.0);
        }
    }
}
