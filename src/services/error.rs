//! Error type shared by the market data and enrichment clients.

use backon::ExponentialBuilder;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("CSV decode failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("No data for {0}")]
    NotFound(String),
}

impl DataError {
    /// Transport failures, throttling and server errors are worth another try.
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            DataError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Backoff applied to every outbound data request.
pub fn default_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(250))
        .with_max_delay(Duration::from_secs(4))
        .with_max_times(3)
}
