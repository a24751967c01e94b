//! Main signal evaluation engine.

use crate::models::bar::PriceBar;
use crate::models::signal::SignalResult;
use crate::signals::conditions::{ConditionSet, IndicatorSnapshot};
use crate::signals::decision::decide;
use crate::signals::thresholds::ThresholdConfig;

/// Score one symbol's daily bars against `thresholds`.
///
/// Returns `None` when there are no bars. Every sub-indicator that lacks data
/// degrades to its neutral value instead of failing the evaluation. Pure and
/// stateless, so concurrent calls for different symbols are safe.
pub fn compute_signals(
    symbol: &str,
    bars: &[PriceBar],
    thresholds: &ThresholdConfig,
) -> Option<SignalResult> {
    SignalEngine::evaluate(symbol, bars, thresholds)
}

pub struct SignalEngine;

impl SignalEngine {
    pub fn evaluate(
        symbol: &str,
        bars: &[PriceBar],
        thresholds: &ThresholdConfig,
    ) -> Option<SignalResult> {
        Self::evaluate_with_indicators(symbol, bars, thresholds).map(|(signal, _, _)| signal)
    }

    /// Evaluate and also return the indicator snapshot and condition set
    /// (for logging and the run report).
    pub fn evaluate_with_indicators(
        symbol: &str,
        bars: &[PriceBar],
        thresholds: &ThresholdConfig,
    ) -> Option<(SignalResult, IndicatorSnapshot, ConditionSet)> {
        let snapshot = IndicatorSnapshot::compute(bars, thresholds)?;
        let conditions = ConditionSet::derive(&snapshot, thresholds);
        let signal = decide(symbol, &snapshot, &conditions, thresholds);
        Some((signal, snapshot, conditions))
    }
}
