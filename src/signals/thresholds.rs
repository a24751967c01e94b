//! Tunable thresholds for one evaluation run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_REQUIRE_CONDITIONS_FOR_WARN: usize = 2;
pub const DEFAULT_VOL_SPIKE_IS_INFO_ONLY: bool = true;
pub const DEFAULT_MOMENTUM_WARN_PCT: f64 = -0.06;

fn default_require_conditions_for_warn() -> usize {
    DEFAULT_REQUIRE_CONDITIONS_FOR_WARN
}

fn default_vol_spike_is_info_only() -> bool {
    DEFAULT_VOL_SPIKE_IS_INFO_ONLY
}

fn default_momentum_warn_pct() -> f64 {
    DEFAULT_MOMENTUM_WARN_PCT
}

/// Thresholds read from the `thresholds` section of `settings.yml`.
///
/// The six window/level fields are required in YAML; the last three fall back
/// to their documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub trend_ma_days: usize,
    pub momentum_days: usize,
    pub drawdown_days: usize,
    pub drawdown_warn_pct: f64,
    pub drawdown_critical_pct: f64,
    pub vol_spike_multiplier: f64,
    #[serde(default = "default_require_conditions_for_warn")]
    pub require_conditions_for_warn: usize,
    #[serde(default = "default_vol_spike_is_info_only")]
    pub vol_spike_is_info_only: bool,
    #[serde(default = "default_momentum_warn_pct")]
    pub momentum_warn_pct: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            trend_ma_days: 50,
            momentum_days: 20,
            drawdown_days: 60,
            drawdown_warn_pct: 0.08,
            drawdown_critical_pct: 0.15,
            vol_spike_multiplier: 2.0,
            require_conditions_for_warn: DEFAULT_REQUIRE_CONDITIONS_FOR_WARN,
            vol_spike_is_info_only: DEFAULT_VOL_SPIKE_IS_INFO_ONLY,
            momentum_warn_pct: DEFAULT_MOMENTUM_WARN_PCT,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("{0} must be greater than zero")]
    ZeroWindow(&'static str),
    #[error("drawdown_warn_pct ({warn}) must be >= 0 and below drawdown_critical_pct ({critical})")]
    DrawdownOrder { warn: f64, critical: f64 },
    #[error("vol_spike_multiplier must be positive, got {0}")]
    VolSpikeMultiplier(f64),
    #[error("require_conditions_for_warn must be at least 1")]
    EmptyQuorum,
}

impl ThresholdConfig {
    /// Reject configurations the scorer cannot meaningfully apply.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (name, value) in [
            ("trend_ma_days", self.trend_ma_days),
            ("momentum_days", self.momentum_days),
            ("drawdown_days", self.drawdown_days),
        ] {
            if value == 0 {
                return Err(ThresholdError::ZeroWindow(name));
            }
        }

        if !(self.drawdown_warn_pct >= 0.0 && self.drawdown_warn_pct < self.drawdown_critical_pct) {
            return Err(ThresholdError::DrawdownOrder {
                warn: self.drawdown_warn_pct,
                critical: self.drawdown_critical_pct,
            });
        }

        if !(self.vol_spike_multiplier > 0.0) {
            return Err(ThresholdError::VolSpikeMultiplier(self.vol_spike_multiplier));
        }

        if self.require_conditions_for_warn == 0 {
            return Err(ThresholdError::EmptyQuorum);
        }

        Ok(())
    }
}
