//! Wiring of live providers for the binaries

use crate::config::{get_finnhub_api_key, is_dry_run, Config};
use crate::jobs::context::DigestContext;
use crate::services::email::{DryRunSender, EmailSender, SendGridSender};
use crate::services::finnhub::FinnhubClient;
use crate::services::market_data::HybridMarketData;
use crate::services::stooq::StooqClient;
use std::sync::Arc;
use tracing::info;

/// `DryRunSender` when `DRY_RUN=1`, otherwise SendGrid from the environment.
pub fn email_sender_from_env() -> Result<Arc<dyn EmailSender>, Box<dyn std::error::Error>> {
    if is_dry_run() {
        info!("DRY_RUN=1: digest will be printed, not sent");
        return Ok(Arc::new(DryRunSender));
    }
    Ok(Arc::new(SendGridSender::from_env()?))
}

/// Stooq history, Finnhub quotes and research, delivery per the environment.
pub fn live_context(config: Config) -> Result<DigestContext, Box<dyn std::error::Error>> {
    let api_key = get_finnhub_api_key()?;
    let research = Arc::new(FinnhubClient::new(api_key.clone())?);
    let market_data = Arc::new(HybridMarketData::new(
        StooqClient::new()?,
        FinnhubClient::new(api_key)?,
    ));
    let sender = email_sender_from_env()?;

    Ok(DigestContext::new(
        Arc::new(config),
        market_data,
        research,
        sender,
    ))
}
