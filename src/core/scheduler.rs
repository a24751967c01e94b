//! Cron scheduler that fires digest runs in the digest timezone

use crate::core::runtime::{DigestRuntime, RuntimeError};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
#[error("Invalid cron expression '{expr}': {message}")]
pub struct SchedulerError {
    pub expr: String,
    pub message: String,
}

pub fn parse_schedule(expr: &str) -> Result<Schedule, SchedulerError> {
    Schedule::from_str(expr).map_err(|e| SchedulerError {
        expr: expr.to_string(),
        message: e.to_string(),
    })
}

pub struct DigestScheduler {
    runtime: Arc<DigestRuntime>,
    schedule: Schedule,
    timezone: Tz,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl DigestScheduler {
    /// `expr` is a six-field cron expression (seconds first) interpreted in
    /// `timezone`, so "0 30 7 * * Mon-Fri" means 07:30 local on weekdays.
    pub fn new(
        runtime: Arc<DigestRuntime>,
        expr: &str,
        timezone: Tz,
    ) -> Result<Self, SchedulerError> {
        let schedule = parse_schedule(expr)?;

        info!(
            cron = %expr,
            timezone = %timezone.name(),
            "DigestScheduler: created with cron '{}' in {}",
            expr,
            timezone.name()
        );

        Ok(Self {
            runtime,
            schedule,
            timezone,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// First fire time strictly after `after`.
    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        next_fire(&self.schedule, self.timezone, after)
    }

    pub async fn start(&self) {
        let runtime = self.runtime.clone();
        let schedule = self.schedule.clone();
        let timezone = self.timezone;

        let handle = tokio::spawn(async move {
            info!("DigestScheduler: started, waiting for cron schedule...");

            loop {
                let now = Utc::now();
                let Some(next_tick) = next_fire(&schedule, timezone, now) else {
                    warn!("DigestScheduler: schedule has no upcoming fire time");
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                };

                info!(next = %next_tick.with_timezone(&timezone), "DigestScheduler: next run at {}", next_tick.with_timezone(&timezone));
                let duration = (next_tick - now).to_std().unwrap_or_default();
                tokio::time::sleep(duration).await;

                match runtime.run_once().await {
                    Ok(report) => info!(
                        subject = %report.subject,
                        "DigestScheduler: scheduled run complete"
                    ),
                    Err(RuntimeError::AlreadyRunning) => {
                        warn!("DigestScheduler: previous run still in progress, skipping tick")
                    }
                    Err(e) => error!(error = %e, "DigestScheduler: scheduled run failed"),
                }
            }
        });

        let mut slot = self.handle.write().await;
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
            warn!("DigestScheduler: restarted, previous loop aborted");
        }
        info!("DigestScheduler: started successfully");
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("DigestScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}

fn next_fire(schedule: &Schedule, timezone: Tz, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule
        .after(&after.with_timezone(&timezone))
        .next()
        .map(|t| t.with_timezone(&Utc))
}
