//! Simple and exponential moving averages
//!
//! Both return one slot per input close; the first (window - 1) slots are
//! `None` (not enough history). EMA is seeded with the SMA of the first
//! window, then EMA[i] = close[i]*k + EMA[i-1]*(1-k) with k = 2/(window+1).

/// Simple moving average over a trailing window
pub fn sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let mut out = Vec::with_capacity(closes.len());
    let mut sum = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        sum += close;
        if i + 1 < window {
            out.push(None);
        } else {
            if i + 1 > window {
                sum -= closes[i - window];
            }
            out.push(Some(sum / window as f64));
        }
    }

    out
}

/// Exponential moving average seeded with the first-window SMA
pub fn ema(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let k = 2.0 / (window as f64 + 1.0);
    let mut out = Vec::with_capacity(closes.len());
    let mut value = 0.0;
    let mut sum = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        if i + 1 < window {
            sum += close;
            out.push(None);
        } else if i + 1 == window {
            sum += close;
            value = sum / window as f64;
            out.push(Some(value));
        } else {
            value = close * k + value * (1.0 - k);
            out.push(Some(value));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sma_warmup_is_none() {
        let out = sma(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!(out[2].is_some());
        assert!(out[3].is_some());
    }

    #[test]
    fn sma_values() {
        let out = sma(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_relative_eq!(out[2].unwrap(), 20.0);
        assert_relative_eq!(out[3].unwrap(), 30.0);
    }

    #[test]
    fn sma_flat_series_is_flat() {
        let closes = vec![100.0; 10];
        let out = sma(&closes, 5);
        for value in out.iter().skip(4) {
            assert_relative_eq!(value.unwrap(), 100.0);
        }
        assert!(out.iter().take(4).all(Option::is_none));
    }

    #[test]
    fn sma_window_one_is_identity() {
        let closes = [10.0, 20.0, 30.0];
        let out = sma(&closes, 1);
        assert_eq!(out, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn sma_zero_window_undefined() {
        let out = sma(&[10.0, 20.0], 0);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn ema_seeded_with_sma() {
        let out = ema(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_relative_eq!(out[2].unwrap(), 20.0);
        // k = 0.5: 40*0.5 + 20*0.5
        assert_relative_eq!(out[3].unwrap(), 30.0);
    }

    #[test]
    fn ema_flat_series_is_flat() {
        let closes = vec![100.0; 8];
        let out = ema(&closes, 4);
        for value in out.iter().skip(3) {
            assert_relative_eq!(value.unwrap(), 100.0);
        }
    }
}
