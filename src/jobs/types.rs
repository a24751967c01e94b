//! Rows and report produced by a digest run

use crate::models::signal::{RiskLevel, SignalResult};
use crate::render::links::ResearchLink;
use crate::services::fundamentals::FundamentalsDisplay;
use crate::services::news::NewsBuckets;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NOT_AVAILABLE: &str = "n/a";
pub const NO_HISTORY_REASON: &str = "No price history returned";
pub const SIGNAL_FAILED_REASON: &str = "Signal computation failed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPulseRow {
    pub symbol: String,
    /// Last price to two decimals, or "n/a" without a quote.
    pub last: String,
    /// One-day change, e.g. "-1.25%".
    pub chg: String,
    pub note: String,
}

/// One symbol of a signal bucket as shown in the digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub symbol: String,
    pub close: String,
    /// `None` when no verdict could be produced.
    pub risk: Option<RiskLevel>,
    pub reason: String,
}

impl SignalRow {
    pub fn placeholder(symbol: &str, reason: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            close: NOT_AVAILABLE.to_string(),
            risk: None,
            reason: reason.to_string(),
        }
    }

    /// Row for a scored symbol: "{reason}. Suggested: {action}. {extra}".
    pub fn from_signal(signal: &SignalResult, extra: &str) -> Self {
        Self {
            symbol: signal.symbol.clone(),
            close: format!("{:.2}", signal.last_close),
            risk: Some(signal.risk_level),
            reason: format!(
                "{}. Suggested: {}. {}",
                signal.reason,
                signal.risk_level.action_label(),
                extra
            ),
        }
    }

    pub fn risk_label(&self) -> &'static str {
        self.risk.map(|r| r.as_str()).unwrap_or(NOT_AVAILABLE)
    }

    pub fn is_flagged(&self) -> bool {
        self.risk.is_some_and(|r| r.is_flagged())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchEntry {
    pub symbol: String,
    pub links: Vec<ResearchLink>,
    pub fundamentals: FundamentalsDisplay,
    pub news: NewsBuckets,
}

/// Everything the email template renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigestSections {
    pub market_pulse: Vec<MarketPulseRow>,
    pub top_focus: Vec<SignalRow>,
    pub holdings: Vec<SignalRow>,
    pub risky: Vec<SignalRow>,
    pub triggered: Vec<SignalRow>,
    pub research: Vec<ResearchEntry>,
}

/// Verdict counts over both buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub ok: usize,
    pub warn: usize,
    pub critical: usize,
    pub unavailable: usize,
}

impl RiskSummary {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a SignalRow>) -> Self {
        rows.into_iter().fold(Self::default(), |mut acc, row| {
            match row.risk {
                Some(RiskLevel::Ok) => acc.ok += 1,
                Some(RiskLevel::Warn) => acc.warn += 1,
                Some(RiskLevel::Critical) => acc.critical += 1,
                None => acc.unavailable += 1,
            }
            acc
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestReport {
    pub generated_at: DateTime<Utc>,
    pub subject: String,
    pub summary: RiskSummary,
    pub sections: DigestSections,
}
