//! Integration tests for the Worker
//!
//! Full digest runs over the live clients with every upstream mocked.


use crate::test_utils::{
    apple_metrics, apple_profile, crash_closes, mock_metrics, mock_news, mock_profile, mock_quote,
    mock_sendgrid, mock_stooq, stooq_csv, symbols,
};
use serde_json::json;
use stockshark::config::Watchlists;
use stockshark::core::runtime::RuntimeError;
use stockshark::jobs::DigestError;
use stockshark::models::signal::RiskLevel;

use test_utils::TestWorker;

fn watchlists() -> Watchlists {
    Watchlists {
        core: symbols(&["SPY"]),
        conviction: symbols(&["AAPL"]),
        risky_watchlist: symbols(&["TSLA", "LCID"]),
        signals_etfs: symbols(&["ARKK"]),
    }
}

async fn mount_market(worker: &TestWorker) {
    let server = &worker.upstream;
    mock_stooq(server, "aapl.us", stooq_csv(&vec![190.0; 45])).await;
    mock_stooq(server, "tsla.us", stooq_csv(&crash_closes())).await;
    mock_stooq(server, "lcid.us", "No data".to_string()).await;
    mock_quote(server, "SPY", 505.0, 500.0).await;
    mock_quote(server, "ARKK", 44.0, 45.0).await;
    mock_profile(server, "AAPL", apple_profile()).await;
    mock_metrics(server, "AAPL", apple_metrics()).await;
    mock_news(
        server,
        "TSLA",
        json!([
            { "headline": "Tesla deliveries miss", "url": "https://www.cnbc.com/tsla", "source": "CNBC" },
            { "headline": "EV price war", "url": "https://example.com/ev", "source": "Reuters" },
        ]),
    )
    .await;
    mock_news(server, "AAPL", json!([])).await;
}

#[tokio::test]
async fn worker_runs_full_digest_against_live_clients() {
    let worker = TestWorker::new(watchlists()).await;
    mount_market(&worker).await;
    mock_sendgrid(&worker.upstream, 202).await;

    let report = worker.runtime.run_once().await.expect("digest run");
    let sections = &report.sections;

    assert_eq!(sections.market_pulse.len(), 2);
    assert_eq!(sections.market_pulse[0].chg, "1.00%");
    assert_eq!(sections.market_pulse[1].chg, "-2.22%");

    assert_eq!(sections.holdings[0].risk, Some(RiskLevel::Ok));
    assert_eq!(sections.risky[0].risk, Some(RiskLevel::Critical));
    assert_eq!(sections.risky[1].risk, None);
    assert_eq!(sections.top_focus[0].symbol, "TSLA");

    let research: Vec<_> = sections.research.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(research, vec!["AAPL", "TSLA"]);
    assert_eq!(sections.research[0].fundamentals.market_cap, "2950.0B");
    assert_eq!(sections.research[0].fundamentals.stance, "Healthy");
    // No profile mocked for TSLA.
    assert_eq!(sections.research[1].fundamentals.stance, "n/a");
    assert_eq!(sections.research[1].news.cnbc.len(), 1);

    let html = worker.delivered_html().await;
    assert_eq!(html.len(), 1);
    assert!(html[0].contains("Tesla deliveries miss"));
    assert!(html[0].contains("Trim candidate"));
    assert!(html[0].contains("2950.0B"));

    assert_eq!(worker.metrics.digest_runs_total.get(), 1);
    assert_eq!(worker.metrics.symbols_evaluated_total.get(), 2);
    assert!(worker.runtime.latest().await.is_some());
}

#[tokio::test]
async fn worker_reports_rejected_delivery() {
    let worker = TestWorker::new(watchlists()).await;
    mount_market(&worker).await;
    mock_sendgrid(&worker.upstream, 401).await;

    let err = worker.runtime.run_once().await.unwrap_err();

    assert!(matches!(err, RuntimeError::Digest(DigestError::Delivery(_))));
    assert_eq!(worker.metrics.digest_run_failures_total.get(), 1);
    assert!(worker.runtime.latest().await.is_none());
}
