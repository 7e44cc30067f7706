//! Enqueue and execution workflows for object tagging and CLIP encoding.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::repository::{MachineLearningRepo, SmartInfoRepo};
use super::types::{SmartInfoUpdate, VisionModelInput};
use crate::asset::{
    AssetId, AssetPager, AssetRepo, AssetSelection, JOBS_ASSET_PAGINATION_SIZE, WithoutProperty,
};
use crate::job::{EntityId, JobItem, JobOptions, JobQueue};
use crate::system_config::{SystemConfig, SystemConfigCore};

/// What an enqueue workflow looks for and what it queues per asset.
struct QueueSpec {
    property: WithoutProperty,
    job: fn(EntityId) -> JobItem,
}

const OBJECT_TAGGING: QueueSpec = QueueSpec {
    property: WithoutProperty::ObjectTags,
    job: JobItem::ClassifyImage,
};

const CLIP_ENCODING: QueueSpec = QueueSpec {
    property: WithoutProperty::ClipEncoding,
    job: JobItem::EncodeClip,
};

/// Decides which assets need tags or CLIP embeddings and produces them.
///
/// Holds only handles to its collaborators. Config is re-read on every call
/// and nothing else is kept between invocations, so one instance can serve
/// any number of concurrent workers. Two executions for the same asset are
/// not serialized; the later write wins.
pub struct SmartInfoService {
    asset_repo: Arc<dyn AssetRepo>,
    config_core: SystemConfigCore,
    job_repo: Arc<dyn JobQueue>,
    smart_info_repo: Arc<dyn SmartInfoRepo>,
    machine_learning: Arc<dyn MachineLearningRepo>,
}

impl SmartInfoService {
    #[must_use]
    pub fn new(
        asset_repo: Arc<dyn AssetRepo>,
        config_core: SystemConfigCore,
        job_repo: Arc<dyn JobQueue>,
        smart_info_repo: Arc<dyn SmartInfoRepo>,
        machine_learning: Arc<dyn MachineLearningRepo>,
    ) -> Self {
        Self {
            asset_repo,
            config_core,
            job_repo,
            smart_info_repo,
            machine_learning,
        }
    }

    /// Route a job to its handler.
    pub async fn handle_job(&self, item: JobItem) -> anyhow::Result<()> {
        match item {
            JobItem::QueueObjectTagging(options) => self.handle_queue_object_tagging(options).await,
            JobItem::ClassifyImage(data) => self.handle_classify_image(data).await,
            JobItem::QueueEncodeClip(options) => self.handle_queue_encode_clip(options).await,
            JobItem::EncodeClip(data) => self.handle_encode_clip(data).await,
        }
    }

    pub async fn handle_queue_object_tagging(&self, options: JobOptions) -> anyhow::Result<()> {
        self.queue_assets(&OBJECT_TAGGING, options).await
    }

    pub async fn handle_queue_encode_clip(&self, options: JobOptions) -> anyhow::Result<()> {
        self.queue_assets(&CLIP_ENCODING, options).await
    }

    #[tracing::instrument(skip_all, fields(asset_id = %id))]
    pub async fn handle_classify_image(&self, EntityId { id }: EntityId) -> anyhow::Result<()> {
        let Some(config) = self.enabled_config().await? else {
            return Ok(());
        };
        let Some((asset_id, input)) = self.resolve_input(&id).await? else {
            return Ok(());
        };

        let ml = &config.machine_learning;
        let tags = self
            .machine_learning
            .classify_image(&ml.url, &input, &ml.classification)
            .await?;

        debug!("Classified asset {asset_id}: {} tag(s)", tags.len());
        self.smart_info_repo
            .upsert(&SmartInfoUpdate::tags(asset_id, tags))
            .await
    }

    #[tracing::instrument(skip_all, fields(asset_id = %id))]
    pub async fn handle_encode_clip(&self, EntityId { id }: EntityId) -> anyhow::Result<()> {
        let Some(config) = self.enabled_config().await? else {
            return Ok(());
        };
        let Some((asset_id, input)) = self.resolve_input(&id).await? else {
            return Ok(());
        };

        let ml = &config.machine_learning;
        let embedding = self
            .machine_learning
            .encode_image(&ml.url, &input, &ml.clip)
            .await?;

        debug!("Encoded asset {asset_id}: {} dimension(s)", embedding.len());
        self.smart_info_repo
            .upsert(&SmartInfoUpdate::clip_embedding(asset_id, embedding))
            .await
    }

    async fn queue_assets(&self, spec: &QueueSpec, options: JobOptions) -> anyhow::Result<()> {
        if self.enabled_config().await?.is_none() {
            return Ok(());
        }

        let selection = if options.force {
            AssetSelection::All
        } else {
            AssetSelection::Without(spec.property)
        };
        let mut pager = AssetPager::new(
            self.asset_repo.as_ref(),
            selection,
            JOBS_ASSET_PAGINATION_SIZE,
        );

        let mut queued = 0_usize;
        while let Some(assets) = pager.next_page().await? {
            for asset in assets {
                self.job_repo.queue((spec.job)(EntityId { id: asset.id })).await?;
                queued += 1;
            }
        }

        info!(
            "Queued {queued} job(s) for assets {}",
            if options.force {
                "(all)".to_string()
            } else {
                format!("without {}", spec.property)
            }
        );
        Ok(())
    }

    /// The current config, or `None` when machine learning is switched off.
    async fn enabled_config(&self) -> anyhow::Result<Option<SystemConfig>> {
        let config = self.config_core.get_config().await?;
        if config.machine_learning.enabled {
            Ok(Some(config))
        } else {
            debug!("Machine learning is disabled, nothing to do");
            Ok(None)
        }
    }

    /// Look up the asset and its inference input. `None` means skip.
    async fn resolve_input(
        &self,
        id: &AssetId,
    ) -> anyhow::Result<Option<(AssetId, VisionModelInput)>> {
        let assets = self.asset_repo.get_by_ids(std::slice::from_ref(id)).await?;
        let Some(asset) = assets.into_iter().next() else {
            warn!("Asset {id} not found, skipping");
            return Ok(None);
        };

        let Some(image_path) = asset.renderable_path().map(ToString::to_string) else {
            debug!("Asset {id} has no resize path yet, skipping");
            return Ok(None);
        };

        Ok(Some((asset.id, VisionModelInput { image_path })))
    }
}
