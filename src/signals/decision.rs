//! Risk-level precedence and reason-string construction.
//!
//! CRITICAL is driven by drawdown depth alone and short-circuits everything
//! else. WARN needs a quorum of weak conditions. A volatility spike on an
//! otherwise clean symbol only adds an informational note.

use crate::models::signal::{RiskLevel, SignalResult};
use crate::signals::conditions::{Condition, ConditionSet, IndicatorSnapshot};
use crate::signals::thresholds::ThresholdConfig;

pub const NO_FLAGS_REASON: &str = "No major risk flags from the configured rules";
pub const VOL_SPIKE_INFO_CLAUSE: &str = "Volatility spike (info)";
pub const REASON_SEPARATOR: &str = "; ";

/// Format a fraction as a one-decimal percentage, `-0.07` -> `-7.0%`.
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn drawdown_clause(snapshot: &IndicatorSnapshot, thresholds: &ThresholdConfig) -> String {
    format!(
        "Drawdown {} from recent {}D high",
        format_pct(snapshot.drawdown),
        thresholds.drawdown_days
    )
}

fn momentum_clause(snapshot: &IndicatorSnapshot, thresholds: &ThresholdConfig) -> String {
    format!(
        "Momentum {} over {}D",
        format_pct(snapshot.momentum),
        thresholds.momentum_days
    )
}

/// Clause text for a condition reported alongside a CRITICAL verdict.
fn critical_clause(
    condition: Condition,
    snapshot: &IndicatorSnapshot,
    thresholds: &ThresholdConfig,
) -> String {
    match condition {
        Condition::Drawdown => format!("{} (critical)", drawdown_clause(snapshot, thresholds)),
        Condition::TrendBreak => "Trend is weakening (below MA + negative slope)".to_string(),
        Condition::Momentum => momentum_clause(snapshot, thresholds),
        Condition::VolSpike => "Volatility spike vs recent average".to_string(),
    }
}

/// Clause text for a condition counted toward a WARN verdict. Volatility
/// spikes never get a WARN clause even when they count toward the quorum.
fn warn_clause(
    condition: Condition,
    snapshot: &IndicatorSnapshot,
    thresholds: &ThresholdConfig,
) -> Option<String> {
    match condition {
        Condition::TrendBreak => Some("Trend weakening (below MA + negative slope)".to_string()),
        Condition::Drawdown => Some(drawdown_clause(snapshot, thresholds)),
        Condition::Momentum => Some(momentum_clause(snapshot, thresholds)),
        Condition::VolSpike => None,
    }
}

fn join_reasons(reasons: &[String]) -> String {
    if reasons.is_empty() {
        NO_FLAGS_REASON.to_string()
    } else {
        reasons.join(REASON_SEPARATOR)
    }
}

/// Map a snapshot and its condition set to the final verdict.
pub fn decide(
    symbol: &str,
    snapshot: &IndicatorSnapshot,
    conditions: &ConditionSet,
    thresholds: &ThresholdConfig,
) -> SignalResult {
    let mut reasons: Vec<String> = Vec::new();

    if snapshot.drawdown >= thresholds.drawdown_critical_pct {
        // The drawdown clause leads unconditionally, the rest follow in order.
        reasons.push(critical_clause(Condition::Drawdown, snapshot, thresholds));
        for condition in [Condition::TrendBreak, Condition::Momentum, Condition::VolSpike] {
            if conditions.contains(condition) {
                reasons.push(critical_clause(condition, snapshot, thresholds));
            }
        }
        return SignalResult::new(
            symbol.to_string(),
            snapshot.last_close,
            RiskLevel::Critical,
            join_reasons(&reasons),
        );
    }

    let mut risk = RiskLevel::Ok;
    let quorum = conditions.warn_candidates(thresholds);
    if quorum.len() >= thresholds.require_conditions_for_warn {
        risk = RiskLevel::Warn;
        reasons.extend(
            quorum
                .iter()
                .filter_map(|c| warn_clause(c, snapshot, thresholds)),
        );
    }

    if risk == RiskLevel::Ok && conditions.contains(Condition::VolSpike) {
        reasons.push(VOL_SPIKE_INFO_CLAUSE.to_string());
    }

    SignalResult::new(
        symbol.to_string(),
        snapshot.last_close,
        risk,
        join_reasons(&reasons),
    )
}
