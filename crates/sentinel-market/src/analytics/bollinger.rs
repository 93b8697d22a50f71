//! Bollinger Bands: rolling mean with a band of k standard deviations
//!
//! Std is population standard deviation over the window (divide by N).
//! The first (window - 1) slots are `None`.

use serde::Serialize;

pub const DEFAULT_BOLLINGER_WINDOW: usize = 20;
pub const DEFAULT_BOLLINGER_K: f64 = 2.0;

/// One band sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn bollinger(closes: &[f64], window: usize, k: f64) -> Vec<Option<Band>> {
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
        let middle = slice.iter().sum::<f64>() / window as f64;
        let variance = slice
            .iter()
            .map(|c| (c - middle) * (c - middle))
            .sum::<f64>()
            / window as f64;
        let offset = k * variance.sqrt();

        out.push(Some(Band {
            upper: middle + offset,
            middle,
            lower: middle - offset,
        }));
    }

    out
}
