//! Worker pool that runs queued jobs through the smart info service.

use std::sync::Arc;

use enricher_core::{JobItem, JobName, SmartInfoService};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

use crate::queue::JobReceiver;

/// Outcome counts of one [`JobWorkerPool::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl WorkerReport {
    fn record(&mut self, joined: Result<(JobName, anyhow::Result<()>), JoinError>) {
        match joined {
            Ok((name, Ok(()))) => {
                debug!("{name} job succeeded");
                self.succeeded += 1;
            }
            Ok((name, Err(e))) => {
                error!("{name} job failed: {e:#}");
                self.failed += 1;
            }
            Err(e) => {
                error!("Job task aborted: {e}");
                self.failed += 1;
            }
        }
    }
}

/// Runs jobs concurrently, at most `concurrency` at a time.
///
/// Enqueue jobs run alone: in-flight jobs finish first and nothing else
/// starts until the enqueue job returns, so no per-asset write shrinks a
/// "without" result set while its pager advances.
///
/// Failed jobs are logged and counted, never retried.
pub struct JobWorkerPool {
    service: Arc<SmartInfoService>,
    concurrency: usize,
}

impl JobWorkerPool {
    #[must_use]
    pub fn new(service: Arc<SmartInfoService>, concurrency: usize) -> Self {
        Self {
            service,
            concurrency: concurrency.max(1),
        }
    }

    /// Drain `receiver` until nothing is buffered and nothing is running.
    ///
    /// Jobs queued by a running job are picked up before the pool stops.
    pub async fn run(&self, mut receiver: JobReceiver) -> anyhow::Result<WorkerReport> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut report = WorkerReport::default();

        loop {
            while let Ok(job) = receiver.try_recv() {
                if job.is_enqueue() {
                    while let Some(joined) = tasks.join_next().await {
                        report.record(joined);
                    }
                    let name = job.name();
                    report.record(Ok((name, Self::execute(&self.service, job).await)));
                    continue;
                }

                let permit = Arc::clone(&semaphore).acquire_owned().await?;
                let service = Arc::clone(&self.service);
                tasks.spawn(async move {
                    let _permit = permit;
                    let name = job.name();
                    (name, Self::execute(&service, job).await)
                });
            }

            match tasks.join_next().await {
                Some(joined) => report.record(joined),
                None => break,
            }
        }

        info!(
            "Worker pool idle: {} succeeded, {} failed",
            report.succeeded, report.failed
        );
        Ok(report)
    }

    async fn execute(service: &SmartInfoService, job: JobItem) -> anyhow::Result<()> {
        debug!("Running {} job", job.name());
        service.handle_job(job).await
    }
}
