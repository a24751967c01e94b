//! Stockshark Worker
//!
//! Runs the digest on the configured cron schedule and serves health,
//! metrics and manual-trigger endpoints over HTTP.

use dotenvy::dotenv;
use stockshark::config::{get_environment, Config};
use stockshark::core::bootstrap::live_context;
use stockshark::core::http::{start_server, AppState};
use stockshark::core::runtime::DigestRuntime;
use stockshark::core::scheduler::DigestScheduler;
use stockshark::jobs::DigestWorkflow;
use stockshark::logging;
use stockshark::metrics::Metrics;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let env = get_environment();
    info!("Starting Stockshark Worker");
    info!(environment = %env, "Environment");

    let config = Config::load_default()?;
    let schedule = config.settings.digest.schedule.clone();
    let timezone = config.timezone;
    info!(
        cron = %schedule,
        timezone = %timezone.name(),
        concurrency = config.settings.digest.concurrency,
        "Digest schedule: '{}' ({})",
        schedule,
        timezone.name()
    );

    let metrics = Arc::new(Metrics::new()?);
    let context = live_context(config)?.with_metrics(metrics.clone());
    let runtime = Arc::new(DigestRuntime::new(DigestWorkflow::new(Arc::new(context))));

    let scheduler = DigestScheduler::new(runtime.clone(), &schedule, timezone)?;
    scheduler.start().await;

    let state = AppState::new(metrics, Some(runtime));
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!(port = port, "Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            scheduler.stop().await;
            info!("Worker stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
            scheduler.stop().await;
        }
    }

    Ok(())
}
