//! End-to-end digest run
//!
//! market pulse -> holdings and risky buckets -> top focus -> research pack
//! -> render -> deliver

use crate::jobs::context::DigestContext;
use crate::jobs::handlers::{
    build_market_pulse, build_research_pack, research_symbols, run_bucket, select_top_focus,
};
use crate::jobs::types::{DigestReport, DigestSections, RiskSummary, SignalRow};
use crate::render::email::render_digest;
use crate::services::email::EmailError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Digest delivery failed: {0}")]
    Delivery(#[from] EmailError),
}

pub struct DigestWorkflow {
    ctx: Arc<DigestContext>,
}

impl DigestWorkflow {
    pub fn new(ctx: Arc<DigestContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &DigestContext {
        &self.ctx
    }

    /// Gather every section of the digest. Individual symbol failures are
    /// already folded into placeholder rows.
    pub async fn assemble_sections(&self) -> DigestSections {
        let ctx = self.ctx.as_ref();
        let watchlists = &ctx.config.watchlists;

        let market_pulse = build_market_pulse(ctx).await;
        let holdings = run_bucket(ctx, &watchlists.conviction).await;
        let risky = run_bucket(ctx, &watchlists.risky_watchlist).await;

        let triggered: Vec<SignalRow> = holdings
            .iter()
            .chain(&risky)
            .filter(|row| row.is_flagged())
            .cloned()
            .collect();
        let top_focus = select_top_focus(&triggered);

        let symbols = research_symbols(&watchlists.conviction, &risky);
        let research = build_research_pack(ctx, &symbols).await;

        DigestSections {
            market_pulse,
            top_focus,
            holdings,
            risky,
            triggered,
            research,
        }
    }

    pub async fn run(&self) -> Result<DigestReport, DigestError> {
        self.run_at(Utc::now()).await
    }

    /// Run as if the clock read `now`; the title and subject use the
    /// configured timezone.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<DigestReport, DigestError> {
        let start = Instant::now();
        let ctx = self.ctx.as_ref();

        info!(
            holdings = ctx.config.watchlists.conviction.len(),
            risky = ctx.config.watchlists.risky_watchlist.len(),
            "DigestWorkflow: starting run"
        );

        let sections = self.assemble_sections().await;
        let summary = RiskSummary::from_rows(sections.holdings.iter().chain(&sections.risky));

        let local_now = now.with_timezone(&ctx.config.timezone);
        let email = render_digest(&local_now, &sections);

        let delivered = ctx.sender.send(&email.subject, &email.html).await;

        if let Some(ref metrics) = ctx.metrics {
            metrics
                .digest_run_duration_seconds
                .observe(start.elapsed().as_secs_f64());
            match delivered {
                Ok(()) => metrics.digest_runs_total.inc(),
                Err(_) => metrics.digest_run_failures_total.inc(),
            }
        }

        if let Err(e) = delivered {
            error!(error = %e, subject = %email.subject, "DigestWorkflow: delivery failed");
            return Err(e.into());
        }

        info!(
            subject = %email.subject,
            ok = summary.ok,
            warn = summary.warn,
            critical = summary.critical,
            unavailable = summary.unavailable,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "DigestWorkflow: run complete"
        );

        Ok(DigestReport {
            generated_at: now,
            subject: email.subject,
            summary,
            sections,
        })
    }
}
