//! Daily OHLCV bars and the per-symbol series handed to the signal engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum number of daily bars the market-data layer must return before a
/// series is handed to the scorer.
pub const MIN_HISTORY_BARS: usize = 30;

/// One trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Daily bars for one symbol, strictly ascending by timestamp with no
/// duplicate timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from raw provider bars.
    ///
    /// Bars without a finite close are dropped, the rest are sorted by
    /// timestamp and duplicate timestamps collapse to the last bar seen.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        let mut bars: Vec<PriceBar> = bars.into_iter().filter(|b| b.close.is_finite()).collect();
        bars.sort_by_key(|b| b.timestamp);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(prev) if prev.timestamp == bar.timestamp => *prev = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Whether the series is long enough to be scored.
    pub fn has_min_history(&self) -> bool {
        self.bars.len() >= MIN_HISTORY_BARS
    }
}
