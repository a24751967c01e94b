//! Drawdown from the recent closing high

/// Fractional decline of the latest close from the highest close among the
/// last `window` closes.
///
/// Returns 0.0 for an empty window and when the peak is not positive.
pub fn drawdown_from_recent_high(closes: &[f64], window: usize) -> f64 {
    let start = closes.len().saturating_sub(window);
    let recent = &closes[start..];

    let Some(&last) = recent.last() else {
        return 0.0;
    };
    let peak = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if peak <= 0.0 {
        return 0.0;
    }
    (peak - last) / peak
}
