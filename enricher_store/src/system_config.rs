use std::str::FromStr;

use async_trait::async_trait;
use enricher_core::{SystemConfigEntry, SystemConfigKey, SystemConfigRepo};
use enricher_entities::system_config;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, JsonValue, QueryFilter, Set};
use tracing::warn;

use crate::store::EnrichmentStore;

#[async_trait]
impl SystemConfigRepo for EnrichmentStore {
    async fn load(&self) -> anyhow::Result<Vec<SystemConfigEntry>> {
        let rows = system_config::Entity::find().all(self.connection()).await?;
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match SystemConfigKey::from_str(&row.key) {
                Ok(key) => entries.push(SystemConfigEntry::new(
                    key,
                    row.value.unwrap_or(JsonValue::Null),
                )),
                Err(e) => warn!("Ignoring stored config override: {e}"),
            }
        }
        Ok(entries)
    }

    async fn save_all(&self, entries: &[SystemConfigEntry]) -> anyhow::Result<()> {
        for entry in entries {
            let model = system_config::ActiveModel {
                key: Set(entry.key.as_str().to_owned()),
                value: Set(Some(entry.value.clone())),
            };
            system_config::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(system_config::Column::Key)
                        .update_column(system_config::Column::Value)
                        .to_owned(),
                )
                .exec_without_returning(self.connection())
                .await?;
        }
        Ok(())
    }

    async fn delete_keys(&self, keys: &[SystemConfigKey]) -> anyhow::Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        system_config::Entity::delete_many()
            .filter(system_config::Column::Key.is_in(keys.iter().map(|k| k.as_str().to_owned())))
            .exec(self.connection())
            .await?;
        Ok(())
    }
}
