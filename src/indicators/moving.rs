//! Rolling-window and exponential averages.
//!
//! Rolling outputs are aligned with the input: index `i` covers the trailing
//! window ending at `i`, and indices below `window - 1` are `None`.

use super::stats;

fn rolling<F>(values: &[f64], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                f(&values[i + 1 - window..=i])
            }
        })
        .collect()
}

/// Simple moving average over trailing `window` values
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, stats::mean)
}

/// Rolling sample standard deviation
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, stats::std_sample)
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().copied().reduce(f64::min))
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().copied().reduce(f64::max))
}

/// Exponential moving average with span-derived alpha `2 / (span + 1)`.
///
/// Uses bias-adjusted weights, so the average is defined from the first
/// value: `ema[t] = Σ (1-α)^i x[t-i] / Σ (1-α)^i`.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut num = 0.0;
    let mut den = 0.0;
    values
        .iter()
        .map(|&x| {
            num = x + decay * num;
            den = 1.0 + decay * den;
            num / den
        })
        .collect()
}
