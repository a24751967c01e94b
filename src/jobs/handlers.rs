//! Digest steps: market pulse, bucket scoring and the research pack

use crate::config::Wording;
use crate::jobs::context::DigestContext;
use crate::jobs::types::{
    MarketPulseRow, ResearchEntry, SignalRow, NOT_AVAILABLE, NO_HISTORY_REASON,
    SIGNAL_FAILED_REASON,
};
use crate::models::quote::Quote;
use crate::models::signal::RiskLevel;
use crate::render::links::research_links;
use crate::services::fundamentals::FundamentalsDisplay;
use crate::services::news::NewsBuckets;
use crate::signals::engine::SignalEngine;
use futures_util::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const TOP_FOCUS_LIMIT: usize = 5;
pub const RISK_ON_NOTE: &str = "Risk-on proxy";
pub const CORE_INDEX_NOTE: &str = "Core index";

/// First occurrence of each symbol, in input order.
pub fn dedup_symbols<'a>(symbols: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    symbols
        .into_iter()
        .filter(|s| seen.insert(s.as_str()))
        .cloned()
        .collect()
}

/// Text appended after the suggested action for a verdict.
pub fn wording_extra(wording: &Wording, level: RiskLevel) -> String {
    match level {
        RiskLevel::Critical => format!(
            "{}: {}",
            wording.critical_label, wording.suggested_action_critical
        ),
        RiskLevel::Warn => format!("{}: {}", wording.warn_label, wording.suggested_action_warn),
        RiskLevel::Ok => "OK".to_string(),
    }
}

pub fn pulse_row(symbol: &str, quote: Option<&Quote>, risk_on_proxy: bool) -> MarketPulseRow {
    let last = quote
        .and_then(|q| q.current)
        .map(|c| format!("{:.2}", c))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let change = quote.map(Quote::pct_change).unwrap_or(0.0);
    let note = if risk_on_proxy {
        RISK_ON_NOTE
    } else {
        CORE_INDEX_NOTE
    };
    MarketPulseRow {
        symbol: symbol.to_string(),
        last,
        chg: format!("{:.2}%", change * 100.0),
        note: note.to_string(),
    }
}

/// Quotes for `core` plus `signals_etfs`, deduplicated.
pub async fn build_market_pulse(ctx: &DigestContext) -> Vec<MarketPulseRow> {
    let watchlists = &ctx.config.watchlists;
    let symbols = dedup_symbols(watchlists.core.iter().chain(&watchlists.signals_etfs));

    stream::iter(symbols)
        .map(|symbol| async move {
            let quote = match ctx.market_data.get_quote(&symbol).await {
                Ok(q) => Some(q),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "MarketPulse: quote unavailable for {}", symbol);
                    ctx.record_fetch_failure();
                    None
                }
            };
            let risk_on = watchlists.signals_etfs.contains(&symbol);
            pulse_row(&symbol, quote.as_ref(), risk_on)
        })
        .buffered(ctx.concurrency())
        .collect()
        .await
}

/// Fetch and score one symbol. Failures become placeholder rows.
pub async fn evaluate_symbol(ctx: &DigestContext, symbol: &str) -> SignalRow {
    let settings = &ctx.config.settings;

    let series = match ctx
        .market_data
        .get_daily_history(symbol, settings.digest.lookback_days)
        .await
    {
        Ok(Some(series)) => series,
        Ok(None) => {
            debug!(symbol = %symbol, "EvaluateSymbol: no usable history for {}", symbol);
            return SignalRow::placeholder(symbol, NO_HISTORY_REASON);
        }
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "EvaluateSymbol: history fetch failed for {}", symbol);
            ctx.record_fetch_failure();
            return SignalRow::placeholder(symbol, NO_HISTORY_REASON);
        }
    };

    let Some((signal, snapshot, conditions)) =
        SignalEngine::evaluate_with_indicators(symbol, series.bars(), &settings.thresholds)
    else {
        warn!(symbol = %symbol, "EvaluateSymbol: scorer returned no result for {}", symbol);
        return SignalRow::placeholder(symbol, SIGNAL_FAILED_REASON);
    };

    if let Some(ref metrics) = ctx.metrics {
        metrics.record_signal(signal.risk_level);
    }

    info!(
        symbol = %symbol,
        risk = %signal.risk_level,
        close = snapshot.last_close,
        drawdown = snapshot.drawdown,
        momentum = snapshot.momentum,
        conditions = conditions.len(),
        "EvaluateSymbol: {} scored {}",
        symbol,
        signal.risk_level
    );

    SignalRow::from_signal(&signal, &wording_extra(&settings.wording, signal.risk_level))
}

/// Score a bucket with bounded concurrency; rows keep the watchlist order.
pub async fn run_bucket(ctx: &DigestContext, symbols: &[String]) -> Vec<SignalRow> {
    stream::iter(symbols.to_vec())
        .map(|symbol| async move { evaluate_symbol(ctx, &symbol).await })
        .buffered(ctx.concurrency())
        .collect()
        .await
}

/// Flagged rows, CRITICAL before WARN, ties in input order.
pub fn select_top_focus(triggered: &[SignalRow]) -> Vec<SignalRow> {
    let mut focus: Vec<SignalRow> = triggered.to_vec();
    focus.sort_by_key(|row| row.risk.map(|r| r.priority()).unwrap_or(u8::MAX));
    focus.truncate(TOP_FOCUS_LIMIT);
    focus
}

/// Holdings plus every flagged name from the risky bucket.
pub fn research_symbols(conviction: &[String], risky_rows: &[SignalRow]) -> Vec<String> {
    let flagged: Vec<String> = risky_rows
        .iter()
        .filter(|row| row.is_flagged())
        .map(|row| row.symbol.clone())
        .collect();
    dedup_symbols(conviction.iter().chain(&flagged))
}

/// Links, fundamentals and headlines for one symbol. Never fails.
pub async fn build_research_entry(ctx: &DigestContext, symbol: &str) -> ResearchEntry {
    let settings = &ctx.config.settings;

    let fundamentals = match ctx.research.fundamentals(symbol).await {
        Ok(snapshot) => FundamentalsDisplay::from_snapshot(&snapshot),
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "Research: fundamentals unavailable for {}", symbol);
            ctx.record_fetch_failure();
            FundamentalsDisplay::unavailable(symbol)
        }
    };

    let headlines = match ctx
        .research
        .headlines(symbol, settings.news.lookback_days, settings.news.max_items)
        .await
    {
        Ok(headlines) => headlines,
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "Research: headlines unavailable for {}", symbol);
            ctx.record_fetch_failure();
            Vec::new()
        }
    };

    ResearchEntry {
        symbol: symbol.to_string(),
        links: research_links(symbol, settings.instagram_handle()),
        fundamentals,
        news: NewsBuckets::split(headlines),
    }
}

pub async fn build_research_pack(ctx: &DigestContext, symbols: &[String]) -> Vec<ResearchEntry> {
    stream::iter(symbols.to_vec())
        .map(|symbol| async move { build_research_entry(ctx, &symbol).await })
        .buffered(ctx.concurrency())
        .collect()
        .await
}
