//! Trailing window statistics.

/// Trailing simple moving average.
///
/// Entry `i` averages `values[i + 1 - period ..= i]`, so it never looks past
/// index `i`. The first `period - 1` entries are `None`.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                let window = &values[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect()
}

/// One-period simple return; `None` for the first entry.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i == 0 {
                None
            } else {
                Some(values[i] / values[i - 1] - 1.0)
            }
        })
        .collect()
}
