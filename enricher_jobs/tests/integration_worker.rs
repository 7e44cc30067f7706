//! Integration tests for the in-process queue and worker pool.
//!
//! These tests verify that:
//! - An enqueue job fans out into per-asset jobs that the same run executes
//! - Failed jobs are counted and do not stop the pool
//! - A run with nothing queued returns immediately
//! - Enqueue jobs never overlap per-asset jobs

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use enricher_core::testing::{
    FakeAssetRepo, FakeMachineLearning, FakeSystemConfigRepo, RecordingSmartInfoRepo,
};
use enricher_core::{
    Asset, AssetId, AssetRepo, ClassificationConfig, ClipConfig, EntityId, JobItem, JobOptions,
    JobQueue, MachineLearningRepo, Page, PageRequest, SmartInfoService, SmartInfoUpdate,
    SystemConfig, SystemConfigCore, VisionModelInput, WithoutProperty,
};
use enricher_jobs::{InProcessJobQueue, JobReceiver, JobWorkerPool, WorkerReport};

fn thumbnailed(id: &str) -> Asset {
    Asset::new(id, format!("/upload/{id}.jpg")).with_resize_path(format!("/thumbs/{id}.jpg"))
}

fn service(
    queue: InProcessJobQueue,
    assets: impl AssetRepo + 'static,
    machine_learning: Arc<dyn MachineLearningRepo>,
    smart_info: Arc<RecordingSmartInfoRepo>,
) -> Arc<SmartInfoService> {
    let config_core = SystemConfigCore::new(
        Arc::new(FakeSystemConfigRepo::empty()),
        SystemConfig::default(),
    );
    Arc::new(SmartInfoService::new(
        Arc::new(assets),
        config_core,
        Arc::new(queue),
        smart_info,
        machine_learning,
    ))
}

async fn run_pool(service: Arc<SmartInfoService>, receiver: JobReceiver) -> WorkerReport {
    JobWorkerPool::new(service, 2).run(receiver).await.unwrap()
}

#[tokio::test]
async fn test_enqueue_job_fans_out_and_executes() {
    let (queue, receiver) = InProcessJobQueue::channel();
    let assets = vec![thumbnailed("a"), thumbnailed("b"), thumbnailed("c")];
    let asset_repo = FakeAssetRepo::new()
        .with_without_pages(vec![Page::last(assets.clone())])
        .with_assets(assets);
    let machine_learning = Arc::new(FakeMachineLearning::new().with_tags(&["cat"]));
    let smart_info = Arc::new(RecordingSmartInfoRepo::new());
    let service = service(
        queue.clone(),
        asset_repo,
        machine_learning.clone(),
        smart_info.clone(),
    );

    queue
        .queue(JobItem::QueueObjectTagging(JobOptions::default()))
        .await
        .unwrap();
    let report = run_pool(service, receiver).await;

    assert_eq!(
        report,
        WorkerReport {
            succeeded: 4,
            failed: 0
        }
    );
    let mut updates = smart_info.updates().await;
    updates.sort_by(|a, b| a.asset_id.as_str().cmp(b.asset_id.as_str()));
    assert_eq!(
        updates,
        vec![
            SmartInfoUpdate::tags(AssetId::from("a"), vec!["cat".to_string()]),
            SmartInfoUpdate::tags(AssetId::from("b"), vec!["cat".to_string()]),
            SmartInfoUpdate::tags(AssetId::from("c"), vec!["cat".to_string()]),
        ]
    );
    assert_eq!(machine_learning.calls().await.len(), 3);
}

#[tokio::test]
async fn test_failed_jobs_are_counted_not_retried() {
    let (queue, receiver) = InProcessJobQueue::channel();
    let asset_repo = FakeAssetRepo::new().with_assets(vec![thumbnailed("a"), thumbnailed("b")]);
    let machine_learning = Arc::new(FakeMachineLearning::failing("inference unavailable"));
    let smart_info = Arc::new(RecordingSmartInfoRepo::new());
    let service = service(
        queue.clone(),
        asset_repo,
        machine_learning.clone(),
        smart_info.clone(),
    );

    for id in ["a", "b"] {
        queue
            .queue(JobItem::EncodeClip(EntityId::new(AssetId::from(id))))
            .await
            .unwrap();
    }
    let report = run_pool(service, receiver).await;

    assert_eq!(
        report,
        WorkerReport {
            succeeded: 0,
            failed: 2
        }
    );
    assert_eq!(machine_learning.calls().await.len(), 2);
    assert!(smart_info.updates().await.is_empty());
}

#[tokio::test]
async fn test_empty_queue_returns_immediately() {
    let (queue, receiver) = InProcessJobQueue::channel();
    let service = service(
        queue,
        FakeAssetRepo::new(),
        Arc::new(FakeMachineLearning::new()),
        Arc::new(RecordingSmartInfoRepo::new()),
    );

    let report = run_pool(service, receiver).await;

    assert_eq!(report, WorkerReport::default());
}

/// Counts inference calls in flight and asset listings made while any were.
#[derive(Default)]
struct Overlap {
    in_flight: AtomicUsize,
    listings_during_inference: AtomicUsize,
}

struct SlowMachineLearning {
    overlap: Arc<Overlap>,
}

#[async_trait]
impl MachineLearningRepo for SlowMachineLearning {
    async fn classify_image(
        &self,
        _url: &str,
        _input: &VisionModelInput,
        _config: &ClassificationConfig,
    ) -> anyhow::Result<Vec<String>> {
        self.overlap.in_flight.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.overlap.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec!["cat".to_string()])
    }

    async fn encode_image(
        &self,
        _url: &str,
        _input: &VisionModelInput,
        _config: &ClipConfig,
    ) -> anyhow::Result<Vec<f32>> {
        Ok(Vec::new())
    }
}

struct ObservedAssets {
    inner: FakeAssetRepo,
    overlap: Arc<Overlap>,
}

#[async_trait]
impl AssetRepo for ObservedAssets {
    async fn get_all(&self, page: PageRequest) -> anyhow::Result<Page<Asset>> {
        self.inner.get_all(page).await
    }

    async fn get_without(
        &self,
        page: PageRequest,
        property: WithoutProperty,
    ) -> anyhow::Result<Page<Asset>> {
        if self.overlap.in_flight.load(Ordering::SeqCst) > 0 {
            self.overlap
                .listings_during_inference
                .fetch_add(1, Ordering::SeqCst);
        }
        self.inner.get_without(page, property).await
    }

    async fn get_by_ids(&self, ids: &[AssetId]) -> anyhow::Result<Vec<Asset>> {
        self.inner.get_by_ids(ids).await
    }
}

#[tokio::test]
async fn test_enqueue_job_waits_for_running_asset_jobs() {
    let (queue, receiver) = InProcessJobQueue::channel();
    let overlap = Arc::new(Overlap::default());
    let assets = ObservedAssets {
        inner: FakeAssetRepo::new()
            .with_without_pages(vec![Page::last(vec![thumbnailed("c")])])
            .with_assets(vec![thumbnailed("a"), thumbnailed("b"), thumbnailed("c")]),
        overlap: overlap.clone(),
    };
    let smart_info = Arc::new(RecordingSmartInfoRepo::new());
    let service = service(
        queue.clone(),
        assets,
        Arc::new(SlowMachineLearning {
            overlap: overlap.clone(),
        }),
        smart_info.clone(),
    );

    for id in ["a", "b"] {
        queue
            .queue(JobItem::ClassifyImage(EntityId::new(AssetId::from(id))))
            .await
            .unwrap();
    }
    queue
        .queue(JobItem::QueueObjectTagging(JobOptions::default()))
        .await
        .unwrap();
    let report = JobWorkerPool::new(service, 4).run(receiver).await.unwrap();

    assert_eq!(
        report,
        WorkerReport {
            succeeded: 4,
            failed: 0
        }
    );
    assert_eq!(overlap.listings_during_inference.load(Ordering::SeqCst), 0);
    assert_eq!(smart_info.updates().await.len(), 3);
}
