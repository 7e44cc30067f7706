use enricher_config::Config;
use enricher_core::{JobItem, JobOptions};
use enricher_jobs::JobWorkerPool;
use tracing::info;

use super::{Feature, Runtime};

#[derive(Debug, Clone, Copy)]
pub struct QueueInput {
    pub feature: Feature,
    /// Re-process every asset, not only those missing the feature
    pub force: bool,
}

/// Strategy for the enqueue workflows.
///
/// Submits one enqueue job to the in-process queue, then drains the queue
/// with the worker pool so the per-asset jobs it fans out to run in the same
/// invocation.
#[derive(Debug, Clone, Copy)]
pub struct QueueStrategy;

impl super::CommandStrategy for QueueStrategy {
    type Input = QueueInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let runtime = Runtime::connect(&config).await?;

        let options = JobOptions { force: input.force };
        let item = match input.feature {
            Feature::Tags => JobItem::QueueObjectTagging(options),
            Feature::Clip => JobItem::QueueEncodeClip(options),
        };
        info!("Submitting {} job (force={})", item.name(), input.force);

        runtime.service.handle_job(item).await?;
        let report = JobWorkerPool::new(runtime.service, runtime.concurrency)
            .run(runtime.receiver)
            .await?;

        println!(
            "Processed {} job(s): {} succeeded, {} failed",
            report.succeeded + report.failed,
            report.succeeded,
            report.failed
        );
        Ok(())
    }
}
