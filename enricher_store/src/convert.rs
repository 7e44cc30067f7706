use enricher_core::{Asset, AssetId, SmartInfo};
use enricher_entities::{assets, smart_info};
use sea_orm::JsonValue;

fn json_to_embedding(val: &JsonValue) -> Option<Vec<f32>> {
    let arr = val.as_array()?;
    Some(
        arr.iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect(),
    )
}

pub fn embedding_to_json(emb: &[f32]) -> JsonValue {
    JsonValue::Array(emb.iter().map(|f| JsonValue::from(f64::from(*f))).collect())
}

fn json_to_tags(val: &JsonValue) -> Option<Vec<String>> {
    let arr = val.as_array()?;
    Some(
        arr.iter()
            .filter_map(|v| v.as_str().map(ToString::to_string))
            .collect(),
    )
}

pub fn tags_to_json(tags: &[String]) -> JsonValue {
    JsonValue::Array(tags.iter().cloned().map(JsonValue::String).collect())
}

pub fn asset_from_model(m: assets::Model) -> Asset {
    Asset {
        id: AssetId::from(m.id),
        original_path: m.original_path,
        resize_path: m.resize_path,
        created_at: m.created_at.into(),
    }
}

pub fn smart_info_from_model(m: &smart_info::Model) -> SmartInfo {
    SmartInfo {
        asset_id: AssetId::from(m.asset_id.as_str()),
        tags: m.tags.as_ref().and_then(json_to_tags),
        clip_embedding: m.clip_embedding.as_ref().and_then(json_to_embedding),
    }
}
