//! Rule-based risk scoring.

pub mod conditions;
pub mod decision;
pub mod engine;
pub mod thresholds;

pub use conditions::{Condition, ConditionSet, IndicatorSnapshot};
pub use decision::{decide, format_pct, NO_FLAGS_REASON};
pub use engine::{compute_signals, SignalEngine};
pub use thresholds::{ThresholdConfig, ThresholdError};
