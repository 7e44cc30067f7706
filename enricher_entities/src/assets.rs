use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub original_path: String,
    /// Resized rendition; null until thumbnail generation has run.
    pub resize_path: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::smart_info::Entity")]
    SmartInfo,
}

impl Related<super::smart_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SmartInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
