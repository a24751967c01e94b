//! Rule-based fundamental stance from Finnhub profile and basic financials.
//!
//! Finnhub reports margins and growth rates in percent (`23.5` for 23.5%);
//! they are normalized to fractions before scoring.

use crate::services::finnhub::{BasicFinancials, CompanyProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOT_AVAILABLE: &str = "n/a";
pub const LIMITED_METRICS_REASON: &str = "Limited fundamental metrics available";
pub const NO_FUNDAMENTALS_REASON: &str = "No fundamentals returned";

const PE_KEYS: &[&str] = &["peTTM", "pe_ttm"];
const PS_KEYS: &[&str] = &["psTTM", "ps_ttm"];
const EV_EBITDA_KEYS: &[&str] = &["evEbitdaTTM", "ev_ebitda_ttm", "evEbitdaAnnual"];
const GROSS_MARGIN_KEYS: &[&str] = &["grossMarginTTM", "grossMarginAnnual"];
const OPERATING_MARGIN_KEYS: &[&str] = &["operatingMarginTTM", "operatingMarginAnnual"];
const NET_MARGIN_KEYS: &[&str] = &["netMarginTTM", "netMarginAnnual"];
const REVENUE_GROWTH_KEYS: &[&str] = &["revenueGrowthTTM", "revenueGrowthAnnual", "revenueGrowth5Y"];
const EPS_GROWTH_KEYS: &[&str] = &["epsGrowthTTM", "epsGrowthAnnual", "epsGrowth5Y"];
const DEBT_TO_EQUITY_KEYS: &[&str] = &[
    "totalDebtToEquityAnnual",
    "totalDebtToEquityTTM",
    "debtToEquity",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Healthy,
    Mixed,
    Neutral,
    #[serde(rename = "Stretched/Weak")]
    StretchedWeak,
}

impl Stance {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 2 => Stance::Healthy,
            1 => Stance::Mixed,
            0 => Stance::Neutral,
            _ => Stance::StretchedWeak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Healthy => "Healthy",
            Stance::Mixed => "Mixed",
            Stance::Neutral => "Neutral",
            Stance::StretchedWeak => "Stretched/Weak",
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub symbol: String,
    pub name: String,
    pub industry: String,
    /// Billions of USD.
    pub market_cap: Option<f64>,
    pub pe_ttm: Option<f64>,
    pub ps_ttm: Option<f64>,
    pub ev_ebitda: Option<f64>,
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub net_margin: Option<f64>,
    pub revenue_growth_yoy: Option<f64>,
    pub eps_growth_yoy: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub stance: Stance,
    pub stance_reason: String,
}

/// First numeric value among `keys`.
pub fn get_num(financials: &BasicFinancials, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|k| financials.metric.get(*k))
        .find_map(|v| v.as_f64())
        .filter(|v| v.is_finite())
}

/// Like [`get_num`], converting a percent figure to a fraction.
pub fn get_pct(financials: &BasicFinancials, keys: &[&str]) -> Option<f64> {
    get_num(financials, keys).map(|v| v / 100.0)
}

/// Running score plus the reasons that moved it.
#[derive(Default)]
struct Tally {
    score: i32,
    reasons: Vec<&'static str>,
}

impl Tally {
    fn good(&mut self, reason: &'static str) {
        self.score += 1;
        self.reasons.push(reason);
    }

    fn bad(&mut self, reason: &'static str) {
        self.score -= 1;
        self.reasons.push(reason);
    }
}

pub fn score_fundamentals(
    symbol: &str,
    profile: &CompanyProfile,
    financials: &BasicFinancials,
) -> FundamentalSnapshot {
    let name = profile
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(symbol)
        .to_string();
    let industry = profile.industry.clone().unwrap_or_default();
    let market_cap = profile
        .market_capitalization
        .filter(|v| v.is_finite())
        .map(|millions| millions / 1000.0);

    let pe_ttm = get_num(financials, PE_KEYS);
    let ps_ttm = get_num(financials, PS_KEYS);
    let ev_ebitda = get_num(financials, EV_EBITDA_KEYS);
    let gross_margin = get_pct(financials, GROSS_MARGIN_KEYS);
    let operating_margin = get_pct(financials, OPERATING_MARGIN_KEYS);
    let net_margin = get_pct(financials, NET_MARGIN_KEYS);
    let revenue_growth_yoy = get_pct(financials, REVENUE_GROWTH_KEYS);
    let eps_growth_yoy = get_pct(financials, EPS_GROWTH_KEYS);
    let debt_to_equity = get_num(financials, DEBT_TO_EQUITY_KEYS);

    let mut tally = Tally::default();

    if let Some(m) = operating_margin {
        if m >= 0.15 {
            tally.good("Strong operating margin");
        } else if m < 0.05 {
            tally.bad("Thin operating margin");
        }
    }
    if let Some(m) = net_margin {
        if m >= 0.10 {
            tally.good("Healthy net margin");
        } else if m < 0.03 {
            tally.bad("Low net margin");
        }
    }
    if let Some(g) = revenue_growth_yoy {
        if g >= 0.10 {
            tally.good("Solid revenue growth");
        } else if g < 0.03 {
            tally.bad("Weak revenue growth");
        }
    }
    if let Some(g) = eps_growth_yoy {
        if g >= 0.10 {
            tally.good("Solid EPS growth");
        } else if g < 0.0 {
            tally.bad("Negative EPS growth");
        }
    }
    // Valuation bands are sector-agnostic.
    if let Some(pe) = pe_ttm {
        if pe >= 45.0 {
            tally.bad("Stretched P/E");
        } else if pe <= 18.0 {
            tally.good("Reasonable P/E");
        }
    }
    if ps_ttm.is_some_and(|ps| ps >= 15.0) {
        tally.bad("High P/S (rich valuation)");
    }
    if debt_to_equity.is_some_and(|de| de >= 2.0) {
        tally.bad("High leverage (debt/equity)");
    }

    let stance_reason = if tally.reasons.is_empty() {
        LIMITED_METRICS_REASON.to_string()
    } else {
        tally.reasons.join(", ")
    };

    FundamentalSnapshot {
        symbol: symbol.to_string(),
        name,
        industry,
        market_cap,
        pe_ttm,
        ps_ttm,
        ev_ebitda,
        gross_margin,
        operating_margin,
        net_margin,
        revenue_growth_yoy,
        eps_growth_yoy,
        debt_to_equity,
        stance: Stance::from_score(tally.score),
        stance_reason,
    }
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}%", v * 100.0))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Display strings for one research symbol; every missing metric is "n/a".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsDisplay {
    pub name: String,
    pub industry: String,
    pub market_cap: String,
    pub pe: String,
    pub ps: String,
    pub ev_ebitda: String,
    pub op_margin: String,
    pub net_margin: String,
    pub rev_growth: String,
    pub eps_growth: String,
    pub debt_eq: String,
    pub stance: String,
    pub stance_reason: String,
}

impl FundamentalsDisplay {
    pub fn from_snapshot(f: &FundamentalSnapshot) -> Self {
        Self {
            name: f.name.clone(),
            industry: f.industry.clone(),
            market_cap: f
                .market_cap
                .map(|b| format!("{:.1}B", b))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            pe: fixed(f.pe_ttm, 1),
            ps: fixed(f.ps_ttm, 1),
            ev_ebitda: fixed(f.ev_ebitda, 1),
            op_margin: percent(f.operating_margin),
            net_margin: percent(f.net_margin),
            rev_growth: percent(f.revenue_growth_yoy),
            eps_growth: percent(f.eps_growth_yoy),
            debt_eq: fixed(f.debt_to_equity, 2),
            stance: f.stance.to_string(),
            stance_reason: f.stance_reason.clone(),
        }
    }

    /// Placeholder when the fundamentals fetch failed.
    pub fn unavailable(symbol: &str) -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            name: symbol.to_string(),
            industry: String::new(),
            market_cap: na(),
            pe: na(),
            ps: na(),
            ev_ebitda: na(),
            op_margin: na(),
            net_margin: na(),
            rev_growth: na(),
            eps_growth: na(),
            debt_eq: na(),
            stance: na(),
            stance_reason: NO_FUNDAMENTALS_REASON.to_string(),
        }
    }
}
