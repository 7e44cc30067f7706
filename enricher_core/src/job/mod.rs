//! Job vocabulary shared by the orchestrator and whatever queue runs it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::asset::AssetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobName {
    QueueObjectTagging,
    ClassifyImage,
    QueueEncodeClip,
    EncodeClip,
}

impl std::fmt::Display for JobName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueueObjectTagging => write!(f, "queue-object-tagging"),
            Self::ClassifyImage => write!(f, "classify-image"),
            Self::QueueEncodeClip => write!(f, "queue-encode-clip"),
            Self::EncodeClip => write!(f, "encode-clip"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOptions {
    /// Re-process every asset instead of only those missing the property.
    #[serde(default)]
    pub force: bool,
}

impl JobOptions {
    #[must_use]
    pub const fn force() -> Self {
        Self { force: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityId {
    pub id: AssetId,
}

impl EntityId {
    #[must_use]
    pub fn new(id: impl Into<AssetId>) -> Self {
        Self { id: id.into() }
    }
}

/// A named job and its payload, serialized as `{"name": ..., "data": ...}`.
///
/// Jobs carry only identifiers; handlers re-read assets and config when they
/// run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data", rename_all = "kebab-case")]
pub enum JobItem {
    QueueObjectTagging(JobOptions),
    ClassifyImage(EntityId),
    QueueEncodeClip(JobOptions),
    EncodeClip(EntityId),
}

impl JobItem {
    #[must_use]
    pub const fn name(&self) -> JobName {
        match self {
            Self::QueueObjectTagging(_) => JobName::QueueObjectTagging,
            Self::ClassifyImage(_) => JobName::ClassifyImage,
            Self::QueueEncodeClip(_) => JobName::QueueEncodeClip,
            Self::EncodeClip(_) => JobName::EncodeClip,
        }
    }

    /// Whether this job enumerates assets and queues per-asset jobs.
    #[must_use]
    pub const fn is_enqueue(&self) -> bool {
        matches!(self, Self::QueueObjectTagging(_) | Self::QueueEncodeClip(_))
    }
}

/// Fire-and-forget submission to an external job queue.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn queue(&self, item: JobItem) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_item_wire_shape() {
        let item = JobItem::ClassifyImage(EntityId::new("asset-1"));
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"name": "classify-image", "data": {"id": "asset-1"}})
        );
        assert_eq!(item.name(), JobName::ClassifyImage);
        assert_eq!(item.name().to_string(), "classify-image");
    }

    #[test]
    fn queue_job_accepts_missing_force() {
        let item: JobItem =
            serde_json::from_value(json!({"name": "queue-encode-clip", "data": {}})).unwrap();
        assert_eq!(item, JobItem::QueueEncodeClip(JobOptions::default()));
    }

    #[test]
    fn only_queue_jobs_are_enqueue_jobs() {
        assert!(JobItem::QueueObjectTagging(JobOptions::default()).is_enqueue());
        assert!(JobItem::QueueEncodeClip(JobOptions::force()).is_enqueue());
        assert!(!JobItem::ClassifyImage(EntityId::new("a")).is_enqueue());
        assert!(!JobItem::EncodeClip(EntityId::new("a")).is_enqueue());
    }
}
