//! Test utilities for API server integration tests

use crate::test_utils::{config, symbols};
use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use stockshark::config::Watchlists;
use stockshark::core::http::{create_router, AppState};
use stockshark::core::runtime::DigestRuntime;
use stockshark::jobs::{DigestContext, DigestWorkflow};
use stockshark::metrics::Metrics;
use stockshark::models::bar::{PriceBar, PriceSeries};
use stockshark::services::email::{EmailError, EmailSender};
use stockshark::services::market_data::InMemoryMarketData;
use stockshark::services::research::StaticResearch;
use tokio::sync::Notify;

/// Holds every delivery until `release` is notified.
#[derive(Default)]
pub struct GateSender {
    pub release: Notify,
}

#[async_trait]
impl EmailSender for GateSender {
    async fn send(&self, _subject: &str, _html: &str) -> Result<(), EmailError> {
        self.release.notified().await;
        Ok(())
    }
}

fn flat_series(symbol: &str, count: usize) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let bars = (0..count)
        .map(|i| PriceBar::new(50.0, 51.0, 49.0, 50.0, 1_000.0, start + Duration::days(i as i64)))
        .collect();
    PriceSeries::new(symbol, bars)
}

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub runtime: Arc<DigestRuntime>,
    pub gate: Arc<GateSender>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let gate = Arc::new(GateSender::default());

        let watchlists = Watchlists {
            conviction: symbols(&["MSFT"]),
            ..Watchlists::default()
        };
        let ctx = DigestContext::new(
            Arc::new(config(watchlists)),
            Arc::new(InMemoryMarketData::new().with_series(flat_series("MSFT", 40))),
            Arc::new(StaticResearch::new()),
            gate.clone(),
        )
        .with_metrics(metrics.clone());
        let runtime = Arc::new(DigestRuntime::new(DigestWorkflow::new(Arc::new(ctx))));

        let app = create_router(AppState::new(metrics.clone(), Some(runtime.clone())));
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            runtime,
            gate,
        }
    }

    /// Health and metrics only, no digest runtime attached.
    pub fn without_runtime() -> TestServer {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        TestServer::new(create_router(AppState::new(metrics, None))).expect("start test server")
    }

    /// Let the in-flight run deliver and wait for it to finish.
    pub async fn finish_run(&self) {
        self.gate.release.notify_one();
        self.runtime.wait_idle().await;
    }
}
