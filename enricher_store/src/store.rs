use enricher_core::{AssetId, SmartInfo};
use enricher_entities::{assets, smart_info, system_config};
use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Schema,
};
use tracing::{debug, info};

use crate::convert::smart_info_from_model;

/// Database-backed implementation of the asset, smart info and system config
/// repositories.
///
/// # Design
///
/// - One connection pool shared by all three repository traits
/// - Tables are created on connect when missing; parents before children
/// - Asset rows are owned by the upload pipeline and only read here
#[derive(Clone)]
pub struct EnrichmentStore {
    db: DatabaseConnection,
}

impl EnrichmentStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to database for EnrichmentStore");
        let db = Database::connect(database_url).await?;
        let store = Self { db };
        store.ensure_tables().await?;
        info!("EnrichmentStore initialized");
        Ok(store)
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn ensure_tables(&self) -> anyhow::Result<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        let statements: [(&str, TableCreateStatement); 3] = [
            ("assets", schema.create_table_from_entity(assets::Entity)),
            ("smart_info", schema.create_table_from_entity(smart_info::Entity)),
            (
                "system_config",
                schema.create_table_from_entity(system_config::Entity),
            ),
        ];

        for (table, mut stmt) in statements {
            stmt.if_not_exists();
            self.db
                .execute_unprepared(&backend.build(&stmt).to_string())
                .await?;
            debug!("Ensured table {table}");
        }
        Ok(())
    }

    /// Stored derived metadata of one asset, if any was ever written.
    pub async fn find_smart_info(&self, asset_id: &AssetId) -> anyhow::Result<Option<SmartInfo>> {
        let row = smart_info::Entity::find_by_id(asset_id.as_str().to_owned())
            .one(&self.db)
            .await?;
        Ok(row.as_ref().map(smart_info_from_model))
    }

    pub async fn count_assets(&self) -> anyhow::Result<u64> {
        Ok(assets::Entity::find().count(&self.db).await?)
    }
}
