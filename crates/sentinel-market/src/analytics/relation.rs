//! Pairwise correlation and beta over aligned timestamps
//!
//! Two series rarely share every trading day; both statistics are computed
//! over the overlapping timestamps only, and reported as `None` (not zero)
//! when fewer than 2 points overlap or the market variance is zero.

use crate::series::PriceSeries;

/// Closes of both series at their common timestamps, in timestamp order
pub fn align(a: &PriceSeries, b: &PriceSeries) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    let (bars_a, bars_b) = (a.bars(), b.bars());
    let (mut i, mut j) = (0, 0);

    while i < bars_a.len() && j < bars_b.len() {
        match bars_a[i].timestamp.cmp(&bars_b[j].timestamp) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push((bars_a[i].close, bars_b[j].close));
                i += 1;
                j += 1;
            }
        }
    }

    out
}

/// Pearson correlation of the aligned closes
pub fn correlation(a: &PriceSeries, b: &PriceSeries) -> Option<f64> {
    let pairs = align(a, b);
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a) * (x - mean_a);
        var_b += (y - mean_b) * (y - mean_b);
    }

    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }

    Some(cov / (var_a.sqrt() * var_b.sqrt()))
}

/// Beta of `asset` against `market`: cov(asset, market) / var(market)
pub fn beta(asset: &PriceSeries, market: &PriceSeries) -> Option<f64> {
    let pairs = align(asset, market);
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_asset = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_market = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_market = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_asset) * (y - mean_market);
        var_market += (y - mean_market) * (y - mean_market);
    }

    if var_market == 0.0 {
        return None;
    }

    Some(cov / var_market)
}
