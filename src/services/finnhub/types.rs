//! Finnhub REST response shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `/stock/profile2`. Unknown symbols come back as `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "finnhubIndustry", default)]
    pub industry: Option<String>,
    /// Millions of USD.
    #[serde(rename = "marketCapitalization", default)]
    pub market_capitalization: Option<f64>,
}

/// `/stock/metric?metric=all`, keeping the flat `metric` object only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicFinancials {
    #[serde(default)]
    pub metric: Map<String, Value>,
}

/// One `/company-news` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
}
