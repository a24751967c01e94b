//! Daily high-low range and range-expansion spikes

use crate::models::bar::PriceBar;

/// Trailing bars considered when averaging ranges.
pub const RANGE_LOOKBACK: usize = 20;
/// Minimum ranges needed before a spike can be asserted.
pub const RANGE_MIN_POINTS: usize = 10;

pub fn daily_range(bar: &PriceBar) -> f64 {
    (bar.high - bar.low).abs()
}

pub fn daily_ranges(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(daily_range).collect()
}

/// Whether today's range is at least `multiplier` times the average range of
/// the last [`RANGE_LOOKBACK`] bars (today included).
///
/// With fewer than [`RANGE_MIN_POINTS`] bars no spike is asserted.
pub fn volatility_spike(bars: &[PriceBar], multiplier: f64) -> bool {
    let start = bars.len().saturating_sub(RANGE_LOOKBACK);
    let ranges = daily_ranges(&bars[start..]);
    if ranges.len() < RANGE_MIN_POINTS {
        return false;
    }

    let avg = ranges.iter().sum::<f64>() / ranges.len() as f64;
    let today = ranges[ranges.len() - 1];
    avg > 0.0 && today / avg >= multiplier
}
