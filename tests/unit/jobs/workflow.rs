//! Unit tests for the digest workflow over in-memory providers

use crate::test_utils::{
    bars_from_closes, digest_context, flat_bars, slow_slide_closes, symbols, CaptureSender,
    RejectingSender,
};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use stockshark::config::Watchlists;
use stockshark::jobs::handlers::{CORE_INDEX_NOTE, RISK_ON_NOTE};
use stockshark::jobs::types::{NO_HISTORY_REASON, NOT_AVAILABLE};
use stockshark::jobs::{DigestError, DigestWorkflow};
use stockshark::metrics::Metrics;
use stockshark::models::bar::PriceSeries;
use stockshark::models::quote::Quote;
use stockshark::models::signal::RiskLevel;
use stockshark::services::fundamentals::{FundamentalSnapshot, Stance};
use stockshark::services::market_data::InMemoryMarketData;
use stockshark::services::news::Headline;
use stockshark::services::research::StaticResearch;

fn watchlists() -> Watchlists {
    Watchlists {
        core: symbols(&["SPY"]),
        conviction: symbols(&["AAPL", "MSFT"]),
        risky_watchlist: symbols(&["TSLA", "PLTR", "RIVN"]),
        signals_etfs: symbols(&["ARKK", "SPY"]),
    }
}

fn market() -> InMemoryMarketData {
    let mut crash = vec![100.0; 50];
    crash.extend((1..=10).map(|k| 100.0 - 2.0 * k as f64));

    InMemoryMarketData::new()
        .with_series(PriceSeries::new("AAPL", flat_bars(40, 100.0)))
        .with_series(PriceSeries::new("TSLA", bars_from_closes(&crash)))
        .with_series(PriceSeries::new("PLTR", bars_from_closes(&slow_slide_closes())))
        .with_series(PriceSeries::new("RIVN", flat_bars(10, 12.0)))
        .with_quote("SPY", Quote::new(500.0, 495.0))
}

fn apple_fundamentals() -> FundamentalSnapshot {
    FundamentalSnapshot {
        symbol: "AAPL".to_string(),
        name: "Apple Inc".to_string(),
        industry: "Technology".to_string(),
        market_cap: Some(2950.0),
        pe_ttm: Some(29.4),
        ps_ttm: Some(7.6),
        ev_ebitda: None,
        gross_margin: Some(0.45),
        operating_margin: Some(0.30),
        net_margin: Some(0.25),
        revenue_growth_yoy: Some(0.02),
        eps_growth_yoy: Some(0.11),
        debt_to_equity: Some(1.5),
        stance: Stance::Healthy,
        stance_reason: "Strong operating margin, Healthy net margin".to_string(),
    }
}

fn research() -> StaticResearch {
    StaticResearch::new()
        .with_fundamentals(apple_fundamentals())
        .with_headlines(
            "TSLA",
            vec![
                Headline {
                    title: "Tesla slides".to_string(),
                    link: "https://www.cnbc.com/tsla".to_string(),
                    source: "CNBC".to_string(),
                },
                Headline {
                    title: "EV demand cools".to_string(),
                    link: "https://example.com/ev".to_string(),
                    source: "Reuters".to_string(),
                },
            ],
        )
}

fn run_time() -> chrono::DateTime<Utc> {
    // 07:30 in New York.
    Utc.with_ymd_and_hms(2024, 3, 4, 12, 30, 0).unwrap()
}

#[tokio::test]
async fn test_full_run_builds_every_section() {
    let sender = Arc::new(CaptureSender::default());
    let ctx = digest_context(watchlists(), market(), research(), sender.clone());
    let workflow = DigestWorkflow::new(Arc::new(ctx));

    let report = workflow.run_at(run_time()).await.unwrap();
    let sections = &report.sections;

    // Market pulse: core then signal ETFs, SPY only once.
    let pulse: Vec<_> = sections.market_pulse.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(pulse, vec!["SPY", "ARKK"]);
    assert_eq!(sections.market_pulse[0].last, "500.00");
    assert_eq!(sections.market_pulse[0].chg, "1.01%");
    // Listed in both core and signals_etfs: the ETF label wins.
    assert_eq!(sections.market_pulse[0].note, RISK_ON_NOTE);
    assert_eq!(sections.market_pulse[1].last, NOT_AVAILABLE);
    assert_eq!(sections.market_pulse[1].note, RISK_ON_NOTE);

    // Holdings keep watchlist order.
    assert_eq!(sections.holdings[0].symbol, "AAPL");
    assert_eq!(sections.holdings[0].risk, Some(RiskLevel::Ok));
    assert_eq!(
        sections.holdings[0].reason,
        "No major risk flags from the configured rules. Suggested: No action. OK"
    );
    assert_eq!(sections.holdings[1].risk, None);
    assert_eq!(sections.holdings[1].reason, NO_HISTORY_REASON);

    let risky: Vec<_> = sections.risky.iter().map(|r| (r.symbol.as_str(), r.risk)).collect();
    assert_eq!(
        risky,
        vec![
            ("TSLA", Some(RiskLevel::Critical)),
            ("PLTR", Some(RiskLevel::Warn)),
            ("RIVN", None),
        ]
    );
    assert_eq!(
        sections.risky[1].reason,
        "Trend weakening (below MA + negative slope); Momentum -7.0% over 20D. \
         Suggested: Watch closely. Heads-up: Tighten stops"
    );
    assert!(sections.risky[0]
        .reason
        .ends_with("Suggested: Trim candidate. Critical: Trim exposure"));
    assert_eq!(sections.risky[0].close, "80.00");

    let focus: Vec<_> = sections.top_focus.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(focus, vec!["TSLA", "PLTR"]);
    assert_eq!(sections.triggered.len(), 2);

    let research: Vec<_> = sections.research.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(research, vec!["AAPL", "MSFT", "TSLA", "PLTR"]);
    assert_eq!(sections.research[0].fundamentals.name, "Apple Inc");
    assert_eq!(sections.research[0].fundamentals.op_margin, "30.0%");
    assert_eq!(sections.research[1].fundamentals.stance_reason, "No fundamentals returned");
    assert_eq!(sections.research[2].news.cnbc.len(), 1);
    assert_eq!(sections.research[2].news.buzz.len(), 1);
    assert_eq!(sections.research[2].links.len(), 4);

    assert_eq!(report.summary.ok, 1);
    assert_eq!(report.summary.warn, 1);
    assert_eq!(report.summary.critical, 1);
    assert_eq!(report.summary.unavailable, 2);

    assert_eq!(sender.subjects(), vec!["Stockshark Digest — Mon Mar 04".to_string()]);
    assert_eq!(report.subject, "Stockshark Digest — Mon Mar 04");
}

#[tokio::test]
async fn test_run_records_metrics() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let ctx = digest_context(
        watchlists(),
        market(),
        research(),
        Arc::new(CaptureSender::default()),
    )
    .with_metrics(metrics.clone());

    DigestWorkflow::new(Arc::new(ctx)).run_at(run_time()).await.unwrap();

    assert_eq!(metrics.digest_runs_total.get(), 1);
    assert_eq!(metrics.symbols_evaluated_total.get(), 3);
    // ARKK quote plus fundamentals for MSFT, TSLA and PLTR.
    assert_eq!(metrics.data_fetch_failures_total.get(), 4);
    assert_eq!(
        metrics
            .signal_risk_total
            .with_label_values(&["CRITICAL"])
            .get(),
        1
    );
}

#[tokio::test]
async fn test_delivery_failure_is_reported() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let ctx = digest_context(watchlists(), market(), research(), Arc::new(RejectingSender))
        .with_metrics(metrics.clone());

    let err = DigestWorkflow::new(Arc::new(ctx))
        .run_at(run_time())
        .await
        .unwrap_err();

    assert!(matches!(err, DigestError::Delivery(_)));
    assert_eq!(metrics.digest_run_failures_total.get(), 1);
    assert_eq!(metrics.digest_runs_total.get(), 0);
}

#[tokio::test]
async fn test_empty_watchlists_still_deliver() {
    let sender = Arc::new(CaptureSender::default());
    let ctx = digest_context(
        Watchlists::default(),
        InMemoryMarketData::new(),
        StaticResearch::new(),
        sender.clone(),
    );

    let report = DigestWorkflow::new(Arc::new(ctx)).run_at(run_time()).await.unwrap();

    assert!(report.sections.holdings.is_empty());
    assert!(report.sections.research.is_empty());
    assert_eq!(sender.subjects().len(), 1);
}

#[tokio::test]
async fn test_core_only_symbol_is_labelled_core_index() {
    let watchlists = Watchlists {
        core: symbols(&["DIA"]),
        signals_etfs: symbols(&["SMH"]),
        ..Watchlists::default()
    };
    let market = InMemoryMarketData::new()
        .with_quote("DIA", Quote::new(390.0, 400.0))
        .with_quote("SMH", Quote::new(220.0, 200.0));
    let ctx = digest_context(
        watchlists,
        market,
        StaticResearch::new(),
        Arc::new(CaptureSender::default()),
    );

    let sections = DigestWorkflow::new(Arc::new(ctx)).assemble_sections().await;

    assert_eq!(sections.market_pulse[0].note, CORE_INDEX_NOTE);
    assert_eq!(sections.market_pulse[0].chg, "-2.50%");
    assert_eq!(sections.market_pulse[1].note, RISK_ON_NOTE);
    assert_eq!(sections.market_pulse[1].chg, "10.00%");
}

fn require_send<T: Send>(_: &T) {}

#[test]
fn test_run_future_can_be_spawned() {
    let ctx = digest_context(
        watchlists(),
        market(),
        research(),
        Arc::new(CaptureSender::default()),
    );
    let workflow = DigestWorkflow::new(Arc::new(ctx));

    // Spawned by the runtime and the scheduler, so it must be Send.
    let run = workflow.run();
    require_send(&run);
    let sections = workflow.assemble_sections();
    require_send(&sections);
}

#[tokio::test]
async fn test_spawned_run_keeps_watchlist_order() {
    let sender = Arc::new(CaptureSender::default());
    let ctx = digest_context(watchlists(), market(), research(), sender.clone());
    let workflow = DigestWorkflow::new(Arc::new(ctx));

    let report = tokio::spawn(async move { workflow.run_at(run_time()).await })
        .await
        .unwrap()
        .unwrap();

    let risky: Vec<_> = report.sections.risky.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(risky, vec!["TSLA", "PLTR", "RIVN"]);
    let research: Vec<_> = report.sections.research.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(research, vec!["AAPL", "MSFT", "TSLA", "PLTR"]);
    assert_eq!(sender.subjects().len(), 1);
}
