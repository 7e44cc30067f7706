use async_trait::async_trait;
use enricher_core::{SmartInfoField, SmartInfoRepo, SmartInfoUpdate};
use enricher_entities::smart_info;
use sea_orm::sea_query::OnConflict;
use sea_orm::{EntityTrait, Set};
use tracing::debug;

use crate::convert::{embedding_to_json, tags_to_json};
use crate::store::EnrichmentStore;

#[async_trait]
impl SmartInfoRepo for EnrichmentStore {
    async fn upsert(&self, update: &SmartInfoUpdate) -> anyhow::Result<()> {
        let asset_id = update.asset_id.as_str().to_owned();
        let (model, column) = match &update.field {
            SmartInfoField::Tags(tags) => (
                smart_info::ActiveModel {
                    asset_id: Set(asset_id),
                    tags: Set(Some(tags_to_json(tags))),
                    ..Default::default()
                },
                smart_info::Column::Tags,
            ),
            SmartInfoField::ClipEmbedding(embedding) => (
                smart_info::ActiveModel {
                    asset_id: Set(asset_id),
                    clip_embedding: Set(Some(embedding_to_json(embedding))),
                    ..Default::default()
                },
                smart_info::Column::ClipEmbedding,
            ),
        };

        // Only the targeted column is overwritten on conflict.
        smart_info::Entity::insert(model)
            .on_conflict(
                OnConflict::column(smart_info::Column::AssetId)
                    .update_column(column)
                    .to_owned(),
            )
            .exec_without_returning(self.connection())
            .await?;

        debug!(asset_id = %update.asset_id, "Smart info upserted");
        Ok(())
    }
}
