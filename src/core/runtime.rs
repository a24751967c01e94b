//! Digest runtime: one run at a time, latest report retained

use crate::jobs::types::DigestReport;
use crate::jobs::workflow::{DigestError, DigestWorkflow};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("A digest run is already in progress")]
    AlreadyRunning,
    #[error(transparent)]
    Digest(#[from] DigestError),
}

pub struct DigestRuntime {
    workflow: DigestWorkflow,
    run_lock: Arc<Mutex<()>>,
    latest: RwLock<Option<DigestReport>>,
}

impl DigestRuntime {
    pub fn new(workflow: DigestWorkflow) -> Self {
        Self {
            workflow,
            run_lock: Arc::new(Mutex::new(())),
            latest: RwLock::new(None),
        }
    }

    fn try_begin(&self) -> Result<OwnedMutexGuard<()>, RuntimeError> {
        self.run_lock
            .clone()
            .try_lock_owned()
            .map_err(|_| RuntimeError::AlreadyRunning)
    }

    async fn run_guarded(&self, _guard: OwnedMutexGuard<()>) -> Result<DigestReport, RuntimeError> {
        let report = self.workflow.run().await?;
        *self.latest.write().await = Some(report.clone());
        info!(subject = %report.subject, "DigestRuntime: stored latest report");
        Ok(report)
    }

    /// Run now and wait for the result. Fails fast with `AlreadyRunning`
    /// instead of queueing behind an in-flight run.
    pub async fn run_once(&self) -> Result<DigestReport, RuntimeError> {
        let guard = self.try_begin()?;
        self.run_guarded(guard).await
    }

    /// Start a run in the background. The guard is taken before spawning,
    /// so a second call made right after this one returns `AlreadyRunning`.
    pub fn spawn_run(self: &Arc<Self>) -> Result<JoinHandle<()>, RuntimeError> {
        let guard = self.try_begin()?;
        let runtime = Arc::clone(self);
        Ok(tokio::spawn(async move {
            if let Err(e) = runtime.run_guarded(guard).await {
                error!(error = %e, "DigestRuntime: background run failed");
            }
        }))
    }

    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    /// Wait until no run is in flight.
    pub async fn wait_idle(&self) {
        drop(self.run_lock.lock().await);
    }

    pub async fn latest(&self) -> Option<DigestReport> {
        self.latest.read().await.clone()
    }
}
