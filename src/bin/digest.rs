//! Stockshark Digest
//!
//! Builds and delivers today's digest once, then exits.
//! Set DRY_RUN=1 to print the subject and HTML preview instead of sending.

use dotenvy::dotenv;
use stockshark::config::{get_environment, Config};
use stockshark::core::bootstrap::live_context;
use stockshark::jobs::DigestWorkflow;
use stockshark::logging;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = get_environment();
    info!("Starting Stockshark digest run");
    info!(environment = %env, "Environment");

    let config = Config::load_default()?;
    info!(
        timezone = %config.timezone.name(),
        holdings = config.watchlists.conviction.len(),
        risky = config.watchlists.risky_watchlist.len(),
        "Configuration loaded"
    );

    let workflow = DigestWorkflow::new(Arc::new(live_context(config)?));
    let report = workflow.run().await?;

    info!(
        subject = %report.subject,
        critical = report.summary.critical,
        warn = report.summary.warn,
        "Digest run finished"
    );
    Ok(())
}
