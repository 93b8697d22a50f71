//! Z-score based significant-move detection
//!
//! For each bar, z = (close - rolling_mean) / rolling_std over a trailing
//! window that includes the bar itself. A bar is significant when |z|
//! exceeds the threshold. A flat window (std = 0) never flags: the z-score
//! is undefined there, reported as `None`.

use crate::series::PriceSeries;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_SIGNIFICANCE_WINDOW: usize = 20;
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 2.0;

/// Direction of a significant move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A price move whose z-score exceeded the threshold
///
/// Derived, read-only: regenerated on every analysis call.
#[derive(Debug, Clone, Serialize)]
pub struct SignificantMove {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub z_score: f64,
    pub direction: Direction,
}

/// Rolling z-scores of the closes; `None` during warmup or on a flat window
pub fn zscores(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let mut out = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }

        let slice = &closes[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice.iter().map(|c| (c - mean) * (c - mean)).sum::<f64>() / window as f64;
        let std = variance.sqrt();

        if std == 0.0 {
            out.push(None);
        } else {
            out.push(Some((closes[i] - mean) / std));
        }
    }

    out
}

/// All bars of the series whose |z| exceeds the threshold
pub fn significant_moves(
    series: &PriceSeries,
    window: usize,
    threshold: f64,
) -> Vec<SignificantMove> {
    let closes = series.closes();

    zscores(&closes, window)
        .into_iter()
        .zip(series.bars())
        .filter_map(|(z, bar)| {
            let z = z?;
            if z.abs() <= threshold {
                return None;
            }
            Some(SignificantMove {
                symbol: series.symbol().to_string(),
                timestamp: bar.timestamp,
                z_score: z,
                direction: if z > 0.0 { Direction::Up } else { Direction::Down },
            })
        })
        .collect()
}
