//! Finnhub REST client (quotes, company profile, metrics, news).

pub mod client;
pub mod types;

pub use client::{FinnhubClient, FINNHUB_BASE};
pub use types::{BasicFinancials, CompanyProfile, NewsItem};
