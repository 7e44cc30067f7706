use async_trait::async_trait;
use enricher_core::{JobItem, JobName, JobQueue};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

pub type JobReceiver = mpsc::UnboundedReceiver<JobItem>;

#[derive(Debug, Error)]
pub enum JobQueueError {
    #[error("job queue is closed, {0} job was not queued")]
    Closed(JobName),
}

/// Sending half of an unbounded in-process job channel.
///
/// Cloning shares the same channel.
#[derive(Clone)]
pub struct InProcessJobQueue {
    sender: mpsc::UnboundedSender<JobItem>,
}

impl InProcessJobQueue {
    /// Create a queue together with the receiver a worker pool drains.
    #[must_use]
    pub fn channel() -> (Self, JobReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl JobQueue for InProcessJobQueue {
    async fn queue(&self, item: JobItem) -> anyhow::Result<()> {
        let name = item.name();
        self.sender
            .send(item)
            .map_err(|_| JobQueueError::Closed(name))?;
        debug!("Queued {name} job");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enricher_core::{AssetId, EntityId, JobOptions};

    #[tokio::test]
    async fn queued_jobs_arrive_in_order() {
        let (queue, mut receiver) = InProcessJobQueue::channel();
        queue
            .queue(JobItem::QueueObjectTagging(JobOptions::default()))
            .await
            .unwrap();
        queue
            .queue(JobItem::EncodeClip(EntityId::new(AssetId::from("a"))))
            .await
            .unwrap();

        assert_eq!(
            receiver.recv().await,
            Some(JobItem::QueueObjectTagging(JobOptions::default()))
        );
        assert_eq!(
            receiver.recv().await,
            Some(JobItem::EncodeClip(EntityId::new(AssetId::from("a"))))
        );
    }

    #[tokio::test]
    async fn queue_fails_once_receiver_is_dropped() {
        let (queue, receiver) = InProcessJobQueue::channel();
        drop(receiver);

        let err = queue
            .queue(JobItem::ClassifyImage(EntityId::new(AssetId::from("a"))))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<JobQueueError>(),
            Some(JobQueueError::Closed(JobName::ClassifyImage))
        ));
    }
}
