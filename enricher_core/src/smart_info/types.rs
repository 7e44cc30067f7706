use serde::{Deserialize, Serialize};

use crate::asset::AssetId;

/// Request body shared by the image models of the inference service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionModelInput {
    pub image_path: String,
}

/// The one derived field a write replaces.
#[derive(Debug, Clone, PartialEq)]
pub enum SmartInfoField {
    Tags(Vec<String>),
    ClipEmbedding(Vec<f32>),
}

/// Full overwrite of one derived field of an asset.
///
/// An empty `Tags` list is a real write that clears stale tags.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartInfoUpdate {
    pub asset_id: AssetId,
    pub field: SmartInfoField,
}

impl SmartInfoUpdate {
    #[must_use]
    pub const fn tags(asset_id: AssetId, tags: Vec<String>) -> Self {
        Self {
            asset_id,
            field: SmartInfoField::Tags(tags),
        }
    }

    #[must_use]
    pub const fn clip_embedding(asset_id: AssetId, embedding: Vec<f32>) -> Self {
        Self {
            asset_id,
            field: SmartInfoField::ClipEmbedding(embedding),
        }
    }
}

/// Stored derived metadata of one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartInfo {
    pub asset_id: AssetId,
    pub tags: Option<Vec<String>>,
    pub clip_embedding: Option<Vec<f32>>,
}
