//! Enrichment sources for the research pack.

use crate::services::error::DataError;
use crate::services::finnhub::FinnhubClient;
use crate::services::fundamentals::{score_fundamentals, FundamentalSnapshot};
use crate::services::news::{headlines_from_items, Headline};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;

#[async_trait]
pub trait ResearchSource: Send + Sync {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, DataError>;

    /// Recent headlines published within the last `lookback_days`.
    async fn headlines(
        &self,
        symbol: &str,
        lookback_days: i64,
        max_items: usize,
    ) -> Result<Vec<Headline>, DataError>;
}

#[async_trait]
impl ResearchSource for FinnhubClient {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, DataError> {
        let profile = self.company_profile2(symbol).await?;
        let financials = self.basic_financials(symbol).await?;
        Ok(score_fundamentals(symbol, &profile, &financials))
    }

    async fn headlines(
        &self,
        symbol: &str,
        lookback_days: i64,
        max_items: usize,
    ) -> Result<Vec<Headline>, DataError> {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(lookback_days.max(0));
        let items = self.company_news(symbol, from, to).await?;
        Ok(headlines_from_items(&items, max_items))
    }
}

/// Canned fundamentals and headlines; unknown symbols are `NotFound`.
#[derive(Default)]
pub struct StaticResearch {
    fundamentals: HashMap<String, FundamentalSnapshot>,
    headlines: HashMap<String, Vec<Headline>>,
}

impl StaticResearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fundamentals(mut self, snapshot: FundamentalSnapshot) -> Self {
        self.fundamentals.insert(snapshot.symbol.clone(), snapshot);
        self
    }

    pub fn with_headlines(mut self, symbol: &str, headlines: Vec<Headline>) -> Self {
        self.headlines.insert(symbol.to_string(), headlines);
        self
    }
}

#[async_trait]
impl ResearchSource for StaticResearch {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, DataError> {
        self.fundamentals
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::NotFound(symbol.to_string()))
    }

    async fn headlines(
        &self,
        symbol: &str,
        _lookback_days: i64,
        max_items: usize,
    ) -> Result<Vec<Headline>, DataError> {
        Ok(self
            .headlines
            .get(symbol)
            .map(|h| h.iter().take(max_items).cloned().collect())
            .unwrap_or_default())
    }
}
