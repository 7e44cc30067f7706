//! Recording fakes of the collaborator traits.
//!
//! Each fake records the calls it receives so tests can assert on exact
//! payloads and on calls that must not happen.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::asset::{Asset, AssetId, AssetRepo, Page, PageRequest, WithoutProperty};
use crate::job::{JobItem, JobQueue};
use crate::smart_info::{MachineLearningRepo, SmartInfoRepo, SmartInfoUpdate, VisionModelInput};
use crate::system_config::{
    ClassificationConfig, ClipConfig, SystemConfigEntry, SystemConfigKey, SystemConfigRepo,
};

#[derive(Default)]
pub struct FakeSystemConfigRepo {
    entries: Mutex<Vec<SystemConfigEntry>>,
    load_calls: AtomicUsize,
    failure: Option<String>,
}

impl FakeSystemConfigRepo {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries(entries: Vec<SystemConfigEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    /// Every `load` fails with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Overrides with machine learning switched off.
    #[must_use]
    pub fn machine_learning_disabled() -> Self {
        Self::with_entries(vec![SystemConfigEntry::new(
            SystemConfigKey::MachineLearningEnabled,
            false,
        )])
    }

    pub async fn set_entries(&self, entries: Vec<SystemConfigEntry>) {
        *self.entries.lock().await = entries;
    }

    pub async fn entries(&self) -> Vec<SystemConfigEntry> {
        self.entries.lock().await.clone()
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SystemConfigRepo for FakeSystemConfigRepo {
    async fn load(&self) -> anyhow::Result<Vec<SystemConfigEntry>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        Ok(self.entries.lock().await.clone())
    }

    async fn save_all(&self, entries: &[SystemConfigEntry]) -> anyhow::Result<()> {
        let mut stored = self.entries.lock().await;
        for entry in entries {
            stored.retain(|e| e.key != entry.key);
            stored.push(entry.clone());
        }
        Ok(())
    }

    async fn delete_keys(&self, keys: &[SystemConfigKey]) -> anyhow::Result<()> {
        self.entries.lock().await.retain(|e| !keys.contains(&e.key));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetCall {
    GetAll(PageRequest),
    GetWithout(PageRequest, WithoutProperty),
    GetByIds(Vec<AssetId>),
}

/// Serves scripted pages in order and looks assets up by id.
#[derive(Default)]
pub struct FakeAssetRepo {
    all_pages: Vec<Page<Asset>>,
    without_pages: Vec<Page<Asset>>,
    assets: Vec<Asset>,
    calls: Mutex<Vec<AssetCall>>,
}

impl FakeAssetRepo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_all_pages(mut self, pages: Vec<Page<Asset>>) -> Self {
        self.all_pages = pages;
        self
    }

    #[must_use]
    pub fn with_without_pages(mut self, pages: Vec<Page<Asset>>) -> Self {
        self.without_pages = pages;
        self
    }

    #[must_use]
    pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        self
    }

    pub async fn calls(&self) -> Vec<AssetCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: AssetCall) {
        self.calls.lock().await.push(call);
    }

    fn page_at(pages: &[Page<Asset>], page: PageRequest) -> anyhow::Result<Page<Asset>> {
        let index = usize::try_from(page.skip / page.take.max(1))?;
        pages
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unexpected page request: skip={}", page.skip))
    }
}

#[async_trait]
impl AssetRepo for FakeAssetRepo {
    async fn get_all(&self, page: PageRequest) -> anyhow::Result<Page<Asset>> {
        self.record(AssetCall::GetAll(page)).await;
        Self::page_at(&self.all_pages, page)
    }

    async fn get_without(
        &self,
        page: PageRequest,
        property: WithoutProperty,
    ) -> anyhow::Result<Page<Asset>> {
        self.record(AssetCall::GetWithout(page, property)).await;
        Self::page_at(&self.without_pages, page)
    }

    async fn get_by_ids(&self, ids: &[AssetId]) -> anyhow::Result<Vec<Asset>> {
        self.record(AssetCall::GetByIds(ids.to_vec())).await;
        Ok(self
            .assets
            .iter()
            .filter(|asset| ids.contains(&asset.id))
            .cloned()
            .collect())
    }
}

/// Records queued jobs. Built with [`RecordingJobQueue::failing_after`], it
/// accepts that many jobs and rejects every later one.
#[derive(Default)]
pub struct RecordingJobQueue {
    jobs: Mutex<Vec<JobItem>>,
    failure: Option<(usize, String)>,
}

impl RecordingJobQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self::failing_after(0, message)
    }

    #[must_use]
    pub fn failing_after(accepted: usize, message: &str) -> Self {
        Self {
            failure: Some((accepted, message.to_string())),
            ..Self::default()
        }
    }

    pub async fn jobs(&self) -> Vec<JobItem> {
        self.jobs.lock().await.clone()
    }
}

#[async_trait]
impl JobQueue for RecordingJobQueue {
    async fn queue(&self, item: JobItem) -> anyhow::Result<()> {
        let mut jobs = self.jobs.lock().await;
        if let Some((accepted, message)) = &self.failure {
            if jobs.len() >= *accepted {
                anyhow::bail!("{message}");
            }
        }
        jobs.push(item);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MachineLearningCall {
    Classify(String, VisionModelInput, ClassificationConfig),
    Encode(String, VisionModelInput, ClipConfig),
}

/// Returns canned inference results, or fails every call when built with
/// [`FakeMachineLearning::failing`].
#[derive(Default)]
pub struct FakeMachineLearning {
    tags: Vec<String>,
    embedding: Vec<f32>,
    failure: Option<String>,
    calls: Mutex<Vec<MachineLearningCall>>,
}

impl FakeMachineLearning {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub async fn calls(&self) -> Vec<MachineLearningCall> {
        self.calls.lock().await.clone()
    }

    fn outcome<T>(&self, value: T) -> anyhow::Result<T> {
        match &self.failure {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl MachineLearningRepo for FakeMachineLearning {
    async fn classify_image(
        &self,
        url: &str,
        input: &VisionModelInput,
        config: &ClassificationConfig,
    ) -> anyhow::Result<Vec<String>> {
        self.calls.lock().await.push(MachineLearningCall::Classify(
            url.to_string(),
            input.clone(),
            config.clone(),
        ));
        self.outcome(self.tags.clone())
    }

    async fn encode_image(
        &self,
        url: &str,
        input: &VisionModelInput,
        config: &ClipConfig,
    ) -> anyhow::Result<Vec<f32>> {
        self.calls.lock().await.push(MachineLearningCall::Encode(
            url.to_string(),
            input.clone(),
            config.clone(),
        ));
        self.outcome(self.embedding.clone())
    }
}

#[derive(Default)]
pub struct RecordingSmartInfoRepo {
    updates: Mutex<Vec<SmartInfoUpdate>>,
    failure: Option<String>,
}

impl RecordingSmartInfoRepo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails with `message` and nothing is recorded.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub async fn updates(&self) -> Vec<SmartInfoUpdate> {
        self.updates.lock().await.clone()
    }
}

#[async_trait]
impl SmartInfoRepo for RecordingSmartInfoRepo {
    async fn upsert(&self, update: &SmartInfoUpdate) -> anyhow::Result<()> {
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        self.updates.lock().await.push(update.clone());
        Ok(())
    }
}
