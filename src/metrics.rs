//! Prometheus metrics for digest runs and the worker HTTP server.

use crate::models::signal::RiskLevel;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub digest_runs_total: IntCounter,
    pub digest_run_failures_total: IntCounter,
    pub digest_run_duration_seconds: Histogram,
    pub symbols_evaluated_total: IntCounter,
    pub signal_risk_total: IntCounterVec,
    pub data_fetch_failures_total: IntCounter,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let digest_runs_total =
            IntCounter::new("digest_runs_total", "Digest runs completed")?;
        let digest_run_failures_total =
            IntCounter::new("digest_run_failures_total", "Digest runs that failed")?;
        let digest_run_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("digest_run_duration_seconds", "Wall time of a digest run")
                .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0]),
        )?;
        let symbols_evaluated_total =
            IntCounter::new("symbols_evaluated_total", "Symbols scored by the signal engine")?;
        let signal_risk_total = IntCounterVec::new(
            Opts::new("signal_risk_total", "Scored symbols by risk level"),
            &["level"],
        )?;
        let data_fetch_failures_total = IntCounter::new(
            "data_fetch_failures_total",
            "Market data or enrichment fetches that failed",
        )?;
        let http_requests_total = IntCounter::new("http_requests_total", "HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;

        registry.register(Box::new(digest_runs_total.clone()))?;
        registry.register(Box::new(digest_run_failures_total.clone()))?;
        registry.register(Box::new(digest_run_duration_seconds.clone()))?;
        registry.register(Box::new(symbols_evaluated_total.clone()))?;
        registry.register(Box::new(signal_risk_total.clone()))?;
        registry.register(Box::new(data_fetch_failures_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        Ok(Self {
            registry,
            digest_runs_total,
            digest_run_failures_total,
            digest_run_duration_seconds,
            symbols_evaluated_total,
            signal_risk_total,
            data_fetch_failures_total,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
        })
    }

    pub fn record_signal(&self, level: RiskLevel) {
        self.symbols_evaluated_total.inc();
        self.signal_risk_total
            .with_label_values(&[level.as_str()])
            .inc();
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
