//! Unit tests for indicators over realistic daily series

use crate::test_utils::{bars_from_closes, slow_slide_closes};
use stockshark::indicators::{
    drawdown_from_recent_high, last_sma, momentum, slope, volatility_spike,
};

#[test]
fn test_slide_reads_as_weakening_trend() {
    let closes = slow_slide_closes();
    let last = *closes.last().unwrap();

    let ma = last_sma(&closes, 20).unwrap();
    assert!(last < ma);
    assert!(slope(&closes, 20) < 0.0);
    assert!((momentum(&closes, 20) + 0.07).abs() < 1e-9);
    assert!((drawdown_from_recent_high(&closes, 60) - 0.07).abs() < 1e-9);
}

#[test]
fn test_windows_longer_than_history() {
    let closes = vec![10.0; 15];

    assert!(last_sma(&closes, 50).is_none());
    assert_eq!(momentum(&closes, 20), 0.0);
    // Window clamps to the available history.
    assert_eq!(drawdown_from_recent_high(&closes, 60), 0.0);
}

#[test]
fn test_spike_on_last_bar_only() {
    let mut bars = bars_from_closes(&vec![50.0; 25]);
    assert!(!volatility_spike(&bars, 2.0));

    let last = bars.last_mut().unwrap();
    last.high = last.close + 10.0;
    last.low = last.close - 10.0;
    assert!(volatility_spike(&bars, 2.0));
}
