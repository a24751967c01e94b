//! Indicator snapshot and the boolean risk conditions derived from it.

use crate::indicators::{drawdown_from_recent_high, momentum, slope, sma, volatility_spike};
use crate::models::bar::PriceBar;
use crate::signals::thresholds::ThresholdConfig;
use serde::Serialize;

/// Upper bound on how many MA points feed the MA slope.
pub const MA_SLOPE_WINDOW: usize = 12;

/// Indicator values computed for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub last_close: f64,
    pub last_ma: f64,
    pub above_ma: bool,
    pub ma_slope: f64,
    pub momentum: f64,
    pub drawdown: f64,
    pub vol_spike: bool,
}

impl IndicatorSnapshot {
    /// Compute every indicator the scorer needs. `None` for an empty series.
    pub fn compute(bars: &[PriceBar], thresholds: &ThresholdConfig) -> Option<Self> {
        let last_close = bars.last()?.close;
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let ma = sma(&closes, thresholds.trend_ma_days);
        // Too short for the MA: fall back to the close so "above MA" holds.
        // This biases short histories toward OK instead of flagging them.
        let last_ma = ma.last().copied().flatten().unwrap_or(last_close);
        let above_ma = last_close >= last_ma;

        // Slope of the MA itself, not the raw closes.
        let defined_ma: Vec<f64> = ma.into_iter().flatten().collect();
        let ma_slope = slope(&defined_ma, MA_SLOPE_WINDOW.min(defined_ma.len()));

        Some(Self {
            last_close,
            last_ma,
            above_ma,
            ma_slope,
            momentum: momentum(&closes, thresholds.momentum_days),
            drawdown: drawdown_from_recent_high(&closes, thresholds.drawdown_days),
            vol_spike: volatility_spike(bars, thresholds.vol_spike_multiplier),
        })
    }
}

/// Independent risk conditions. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    TrendBreak,
    Drawdown,
    Momentum,
    VolSpike,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::TrendBreak,
        Condition::Drawdown,
        Condition::Momentum,
        Condition::VolSpike,
    ];

    fn holds(&self, snapshot: &IndicatorSnapshot, thresholds: &ThresholdConfig) -> bool {
        match self {
            // Both required: price under the MA and the MA itself falling.
            Condition::TrendBreak => !snapshot.above_ma && snapshot.ma_slope < 0.0,
            Condition::Drawdown => snapshot.drawdown >= thresholds.drawdown_warn_pct,
            Condition::Momentum => snapshot.momentum <= thresholds.momentum_warn_pct,
            Condition::VolSpike => snapshot.vol_spike,
        }
    }
}

/// The true conditions for one snapshot, kept in [`Condition::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionSet {
    active: Vec<Condition>,
}

impl ConditionSet {
    pub fn derive(snapshot: &IndicatorSnapshot, thresholds: &ThresholdConfig) -> Self {
        let active = Condition::ALL
            .into_iter()
            .filter(|c| c.holds(snapshot, thresholds))
            .collect();
        Self { active }
    }

    pub fn contains(&self, condition: Condition) -> bool {
        self.active.contains(&condition)
    }

    pub fn iter(&self) -> impl Iterator<Item = Condition> + '_ {
        self.active.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Conditions that count toward the WARN quorum.
    pub fn warn_candidates(&self, thresholds: &ThresholdConfig) -> ConditionSet {
        let active = self
            .iter()
            .filter(|c| !(thresholds.vol_spike_is_info_only && *c == Condition::VolSpike))
            .collect();
        ConditionSet { active }
    }
}
