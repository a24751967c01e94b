//! Dependencies shared by every step of a digest run

use crate::config::Config;
use crate::metrics::Metrics;
use crate::services::email::EmailSender;
use crate::services::market_data::MarketDataProvider;
use crate::services::research::ResearchSource;
use std::sync::Arc;

/// Providers are trait objects so runs can be driven by live clients or by
/// in-memory fixtures.
pub struct DigestContext {
    pub config: Arc<Config>,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub research: Arc<dyn ResearchSource>,
    pub sender: Arc<dyn EmailSender>,
    pub metrics: Option<Arc<Metrics>>,
}

impl DigestContext {
    pub fn new(
        config: Arc<Config>,
        market_data: Arc<dyn MarketDataProvider>,
        research: Arc<dyn ResearchSource>,
        sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            config,
            market_data,
            research,
            sender,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Symbols fetched concurrently, never less than one.
    pub fn concurrency(&self) -> usize {
        self.config.settings.digest.concurrency.max(1)
    }

    pub(crate) fn record_fetch_failure(&self) {
        if let Some(ref metrics) = self.metrics {
            metrics.data_fetch_failures_total.inc();
        }
    }
}
