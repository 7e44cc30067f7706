use async_trait::async_trait;

use super::types::{SmartInfoUpdate, VisionModelInput};
use crate::system_config::{ClassificationConfig, ClipConfig};

#[async_trait]
pub trait SmartInfoRepo: Send + Sync {
    /// Overwrite the targeted field of the asset's record, creating the
    /// record if needed. Other fields are left untouched.
    async fn upsert(&self, update: &SmartInfoUpdate) -> anyhow::Result<()>;
}

/// Client of the external inference service.
#[async_trait]
pub trait MachineLearningRepo: Send + Sync {
    async fn classify_image(
        &self,
        url: &str,
        input: &VisionModelInput,
        config: &ClassificationConfig,
    ) -> anyhow::Result<Vec<String>>;

    async fn encode_image(
        &self,
        url: &str,
        input: &VisionModelInput,
        config: &ClipConfig,
    ) -> anyhow::Result<Vec<f32>>;
}
