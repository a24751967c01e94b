//! Market data provider interface and the providers the digest runs against.

use crate::models::bar::PriceSeries;
use crate::models::quote::Quote;
use crate::services::error::DataError;
use crate::services::finnhub::FinnhubClient;
use crate::services::stooq::StooqClient;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars covering roughly `lookback_days` calendar days.
    ///
    /// `Ok(None)` when the source has no usable history or fewer than
    /// [`crate::models::MIN_HISTORY_BARS`] bars.
    async fn get_daily_history(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Option<PriceSeries>, DataError>;

    /// Latest quote (current price and previous close).
    async fn get_quote(&self, symbol: &str) -> Result<Quote, DataError>;
}

/// Stooq for daily history, Finnhub for live quotes.
pub struct HybridMarketData {
    history: StooqClient,
    quotes: FinnhubClient,
}

impl HybridMarketData {
    pub fn new(history: StooqClient, quotes: FinnhubClient) -> Self {
        Self { history, quotes }
    }
}

#[async_trait]
impl MarketDataProvider for HybridMarketData {
    async fn get_daily_history(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Option<PriceSeries>, DataError> {
        self.history.daily_history(symbol, lookback_days).await
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        self.quotes.quote(symbol).await
    }
}

/// Fixed series and quotes held in memory.
#[derive(Default)]
pub struct InMemoryMarketData {
    series: HashMap<String, PriceSeries>,
    quotes: HashMap<String, Quote>,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.symbol().to_string(), series);
        self
    }

    pub fn with_quote(mut self, symbol: &str, quote: Quote) -> Self {
        self.quotes.insert(symbol.to_string(), quote);
        self
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketData {
    async fn get_daily_history(
        &self,
        symbol: &str,
        _lookback_days: u32,
    ) -> Result<Option<PriceSeries>, DataError> {
        Ok(self
            .series
            .get(symbol)
            .filter(|s| s.has_min_history())
            .cloned())
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        self.quotes
            .get(symbol)
            .copied()
            .ok_or_else(|| DataError::NotFound(symbol.to_string()))
    }
}
