//! Relative Strength Index with Wilder's smoothing
//!
//! The first average gain/loss is the simple mean of the changes inside the
//! first `period`-bar window (that is, the first `period - 1` changes);
//! afterwards avg = (prev_avg * (period-1) + current) / period.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss); an all-gains window
//! (avg_loss == 0) is defined as RSI = 100.
//!
//! The first `period - 1` slots are `None`, matching the warmup convention
//! of the other windowed indicators. A period below 2 has no changes to
//! average and yields no defined value.

pub const DEFAULT_RSI_PERIOD: usize = 14;

pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period < 2 || closes.len() < period {
        return vec![None; closes.len()];
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let mut out = vec![None; closes.len()];

    // `period` bars span `period - 1` changes
    let seed = period - 1;
    let mut avg_gain = changes[..seed].iter().filter(|&&c| c > 0.0).sum::<f64>() / seed as f64;
    let mut avg_loss =
        changes[..seed].iter().filter(|&&c| c < 0.0).sum::<f64>().abs() / seed as f64;
    out[seed] = Some(rsi_from_averages(avg_gain, avg_loss));

    for (i, &change) in changes.iter().enumerate().skip(seed) {
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        out[i + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
