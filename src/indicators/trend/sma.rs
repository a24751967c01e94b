//! SMA (Simple Moving Average) indicator

/// Rolling arithmetic mean over `window` trailing points.
///
/// One output per input position; the first `window - 1` positions are
/// `None`. A zero window yields no defined values.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                None
            } else {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

/// Most recent defined SMA value, if the series is long enough.
pub fn last_sma(values: &[f64], window: usize) -> Option<f64> {
    sma(values, window).last().copied().flatten()
}
