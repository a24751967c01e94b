//! Stooq daily history (CSV download).

use crate::models::bar::{PriceBar, PriceSeries};
use crate::services::error::{default_backoff, DataError};
use backon::Retryable;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const STOOQ_BASE: &str = "https://stooq.com";
/// Extra calendar days requested on top of the lookback to cover weekends
/// and holidays.
const CALENDAR_PADDING_DAYS: i64 = 30;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Stooq lists US tickers as lowercase with a `.us` suffix; class shares use
/// a dash (`BRK.B` -> `brk-b.us`).
pub fn to_stooq_symbol(symbol: &str) -> String {
    format!("{}.us", symbol.trim().to_lowercase().replace('.', "-"))
}

#[derive(Debug, Deserialize)]
struct StooqRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open", default)]
    open: Option<f64>,
    #[serde(rename = "High", default)]
    high: Option<f64>,
    #[serde(rename = "Low", default)]
    low: Option<f64>,
    #[serde(rename = "Close", default)]
    close: Option<f64>,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
}

impl StooqRow {
    fn into_bar(self) -> Option<PriceBar> {
        let close = self.close?;
        let timestamp = self.date.and_hms_opt(0, 0, 0)?.and_utc();
        Some(PriceBar::new(
            self.open.unwrap_or(close),
            self.high.unwrap_or(close),
            self.low.unwrap_or(close),
            close,
            self.volume.unwrap_or(0.0),
            timestamp,
        ))
    }
}

/// Parse a Stooq CSV body into a normalized series.
///
/// Rows that fail to decode or lack a close are skipped; a body without the
/// expected header (Stooq answers "No data" for unknown symbols) yields an
/// empty series.
pub fn parse_daily_csv(symbol: &str, body: &str) -> Result<PriceSeries, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "Close") {
        return Ok(PriceSeries::new(symbol, Vec::new()));
    }

    let bars = reader
        .deserialize::<StooqRow>()
        .filter_map(|row| match row {
            Ok(row) => row.into_bar(),
            Err(e) => {
                debug!(symbol = %symbol, error = %e, "Stooq: skipping malformed row");
                None
            }
        })
        .collect();

    Ok(PriceSeries::new(symbol, bars))
}

pub struct StooqClient {
    client: reqwest::Client,
    base_url: String,
}

impl StooqClient {
    pub fn new() -> Result<Self, DataError> {
        let base_url = std::env::var("STOOQ_BASE_URL").unwrap_or_else(|_| STOOQ_BASE.to_string());
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn download(&self, stooq_symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<String, DataError> {
        let url = format!("{}/q/d/l/", self.base_url);
        let params = [
            ("s", stooq_symbol.to_string()),
            ("d1", start.format("%Y%m%d").to_string()),
            ("d2", end.format("%Y%m%d").to_string()),
            ("i", "d".to_string()),
        ];

        let fetch = || {
            let request = self.client.get(&url).query(&params);
            async move {
                let response = request.send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(DataError::Status {
                        endpoint: "/q/d/l/".to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.text().await?)
            }
        };

        fetch
            .retry(default_backoff())
            .when(DataError::is_retryable)
            .notify(|err: &DataError, after: Duration| {
                warn!(symbol = %stooq_symbol, error = %err, "Stooq: retrying in {:?}", after);
            })
            .await
    }

    /// Daily bars from `lookback_days + 30` calendar days ago through today.
    pub async fn daily_history(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Option<PriceSeries>, DataError> {
        let end = Utc::now().date_naive();
        let start = end - ChronoDuration::days(i64::from(lookback_days) + CALENDAR_PADDING_DAYS);

        let body = self.download(&to_stooq_symbol(symbol), start, end).await?;
        let series = parse_daily_csv(symbol, &body)?;

        if !series.has_min_history() {
            debug!(
                symbol = %symbol,
                count = series.len(),
                "Stooq: not enough history for {} ({} bars)",
                symbol,
                series.len()
            );
            return Ok(None);
        }

        Ok(Some(series))
    }
}
