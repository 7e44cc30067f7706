use async_trait::async_trait;
use enricher_core::{Asset, AssetId, AssetRepo, Page, PageRequest, WithoutProperty};
use enricher_entities::{assets, smart_info};
use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select};
use tracing::debug;

use crate::convert::asset_from_model;
use crate::store::EnrichmentStore;

/// Ids of assets whose `property` column has been written, even if empty.
fn enriched_asset_ids(property: WithoutProperty) -> SelectStatement {
    let column = match property {
        WithoutProperty::ObjectTags => smart_info::Column::Tags,
        WithoutProperty::ClipEncoding => smart_info::Column::ClipEmbedding,
    };
    Query::select()
        .column(smart_info::Column::AssetId)
        .from(smart_info::Entity)
        .and_where(column.is_not_null())
        .to_owned()
}

impl EnrichmentStore {
    /// Stable order so skip/take walks every row exactly once, fetching one
    /// extra row to learn whether another page follows.
    async fn fetch_page(
        &self,
        query: Select<assets::Entity>,
        page: PageRequest,
    ) -> anyhow::Result<Page<Asset>> {
        let rows = query
            .order_by_asc(assets::Column::CreatedAt)
            .order_by_asc(assets::Column::Id)
            .offset(page.skip)
            .limit(page.take.saturating_add(1))
            .all(self.connection())
            .await?;
        let items = rows.into_iter().map(asset_from_model).collect();
        Ok(Page::from_overfetch(items, page.take))
    }
}

#[async_trait]
impl AssetRepo for EnrichmentStore {
    async fn get_all(&self, page: PageRequest) -> anyhow::Result<Page<Asset>> {
        debug!(skip = page.skip, take = page.take, "Loading asset page");
        self.fetch_page(assets::Entity::find(), page).await
    }

    async fn get_without(
        &self,
        page: PageRequest,
        property: WithoutProperty,
    ) -> anyhow::Result<Page<Asset>> {
        debug!(skip = page.skip, take = page.take, %property, "Loading unenriched asset page");
        let query = assets::Entity::find()
            .filter(assets::Column::ResizePath.is_not_null())
            .filter(assets::Column::ResizePath.ne(""))
            .filter(assets::Column::Id.not_in_subquery(enriched_asset_ids(property)));
        self.fetch_page(query, page).await
    }

    async fn get_by_ids(&self, ids: &[AssetId]) -> anyhow::Result<Vec<Asset>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = assets::Entity::find()
            .filter(assets::Column::Id.is_in(ids.iter().map(|id| id.as_str().to_owned())))
            .all(self.connection())
            .await?;
        Ok(rows.into_iter().map(asset_from_model).collect())
    }
}
