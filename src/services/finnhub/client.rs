use crate::models::quote::Quote;
use crate::services::error::{default_backoff, DataError};
use crate::services::finnhub::types::{BasicFinancials, CompanyProfile, NewsItem};
use backon::Retryable;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub const FINNHUB_BASE: &str = "https://finnhub.io/api/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub struct FinnhubClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FinnhubClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DataError> {
        let base_url =
            std::env::var("FINNHUB_BASE_URL").unwrap_or_else(|_| FINNHUB_BASE.to_string());
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(base_url, api_key, client))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// GET `path` with `params` plus the API token, retried on transient
    /// failures. The token never appears in returned errors.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, DataError> {
        let url = format!("{}{}", self.base_url, path);

        let fetch = || {
            let request = self
                .client
                .get(&url)
                .query(params)
                .query(&[("token", self.api_key.as_str())]);
            let endpoint = path.to_string();
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| DataError::Http(e.without_url()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(DataError::Status {
                        endpoint,
                        status: status.as_u16(),
                    });
                }
                response
                    .json::<T>()
                    .await
                    .map_err(|e| DataError::InvalidResponse(format!("{}: {}", endpoint, e.without_url())))
            }
        };

        fetch
            .retry(default_backoff())
            .when(DataError::is_retryable)
            .notify(|err: &DataError, after: Duration| {
                warn!(endpoint = %path, error = %err, "Finnhub: retrying in {:?}", after);
            })
            .await
    }

    pub async fn quote(&self, symbol: &str) -> Result<Quote, DataError> {
        debug!(symbol = %symbol, "Finnhub: fetching quote for {}", symbol);
        self.get("/quote", &[("symbol", symbol.to_string())]).await
    }

    pub async fn company_profile2(&self, symbol: &str) -> Result<CompanyProfile, DataError> {
        self.get("/stock/profile2", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn basic_financials(&self, symbol: &str) -> Result<BasicFinancials, DataError> {
        self.get(
            "/stock/metric",
            &[("symbol", symbol.to_string()), ("metric", "all".to_string())],
        )
        .await
    }

    pub async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsItem>, DataError> {
        self.get(
            "/company-news",
            &[
                ("symbol", symbol.to_string()),
                ("from", from.format("%Y-%m-%d").to_string()),
                ("to", to.format("%Y-%m-%d").to_string()),
            ],
        )
        .await
    }
}
