use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical risk verdict for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Ok,
    Warn,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Ok => "OK",
            RiskLevel::Warn => "WARN",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Sort key for the digest: CRITICAL first, then WARN, then OK.
    pub fn priority(&self) -> u8 {
        match self {
            RiskLevel::Critical => 0,
            RiskLevel::Warn => 1,
            RiskLevel::Ok => 2,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, RiskLevel::Warn | RiskLevel::Critical)
    }

    /// Suggested action shown next to the verdict.
    pub fn action_label(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "Trim candidate",
            RiskLevel::Warn => "Watch closely",
            RiskLevel::Ok => "No action",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one scorer evaluation. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub symbol: String,
    pub last_close: f64,
    pub risk_level: RiskLevel,
    pub reason: String,
}

impl SignalResult {
    pub fn new(symbol: String, last_close: f64, risk_level: RiskLevel, reason: String) -> Self {
        Self {
            symbol,
            last_close,
            risk_level,
            reason,
        }
    }
}
