use async_trait::async_trait;

use super::pagination::{Page, PageRequest};
use super::types::{Asset, AssetId, WithoutProperty};

#[async_trait]
pub trait AssetRepo: Send + Sync {
    async fn get_all(&self, page: PageRequest) -> anyhow::Result<Page<Asset>>;

    /// Assets that have a resize path but lack `property`.
    async fn get_without(
        &self,
        page: PageRequest,
        property: WithoutProperty,
    ) -> anyhow::Result<Page<Asset>>;

    async fn get_by_ids(&self, ids: &[AssetId]) -> anyhow::Result<Vec<Asset>>;
}
