//! Historical-simulation Value at Risk
//!
//! The VaR at confidence c is the return at the (1 - c) empirical percentile
//! of the historical return distribution: the threshold the worst (1 - c)
//! share of observed returns fell below. Reported as `None` when the sample
//! is smaller than the minimum size.

pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;
pub const DEFAULT_VAR_MIN_SAMPLES: usize = 20;

/// Historical VaR over a return sample
///
/// Returns the percentile return itself (usually negative); callers wanting
/// "loss at risk" negate it.
pub fn value_at_risk(returns: &[f64], confidence: f64, min_samples: usize) -> Option<f64> {
    if returns.len() < min_samples.max(2) {
        return None;
    }
    if !(0.0..1.0).contains(&(1.0 - confidence)) {
        return None;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(percentile(&sorted, 1.0 - confidence))
}

/// Linear-interpolated percentile of an ascending-sorted sample
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn small_sample_is_insufficient() {
        let returns = [0.01, -0.02, 0.005, -0.01, 0.02];
        assert!(value_at_risk(&returns, 0.95, 20).is_none());
    }

    #[test]
    fn year_of_daily_returns_is_finite() {
        // Deterministic oscillating sample, 252 observations
        let returns: Vec<f64> = (0..252)
            .map(|i| ((i % 21) as f64 - 10.0) / 100.0)
            .collect();

        let var = value_at_risk(&returns, 0.95, 20).expect("sample is large enough");
        assert!(var.is_finite());
        assert!(var < 0.0, "tail of this sample is negative");
    }

    #[test]
    fn percentile_of_uniform_sample() {
        // Returns 1..=100 percent: the 5th percentile sits near the bottom
        let returns: Vec<f64> = (1..=100).map(|i| i as f64 / 100.0).collect();
        let var = value_at_risk(&returns, 0.95, 20).unwrap();

        // rank = 0.05 * 99 = 4.95 -> between 0.05 and 0.06
        assert_relative_eq!(var, 0.05 * 0.05 + 0.06 * 0.95, max_relative = 1e-9);
    }

    #[test]
    fn higher_confidence_gives_deeper_tail() {
        let returns: Vec<f64> = (0..100).map(|i| (i as f64 - 50.0) / 100.0).collect();
        let var95 = value_at_risk(&returns, 0.95, 20).unwrap();
        let var99 = value_at_risk(&returns, 0.99, 20).unwrap();

        assert!(var99 < var95);
    }
}
