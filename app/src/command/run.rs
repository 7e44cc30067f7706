use enricher_config::Config;
use enricher_core::{AssetId, EntityId};

use super::{Feature, Runtime};

#[derive(Debug, Clone)]
pub struct RunInput {
    pub feature: Feature,
    pub asset_id: String,
}

/// Strategy for running one execution workflow against a single asset.
///
/// Prints the stored result afterwards so a skipped asset (disabled feature,
/// missing thumbnail) is visible as an unchanged record.
#[derive(Debug, Clone, Copy)]
pub struct RunStrategy;

impl super::CommandStrategy for RunStrategy {
    type Input = RunInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let runtime = Runtime::connect(&config).await?;
        let asset_id = AssetId::from(input.asset_id);

        match input.feature {
            Feature::Tags => {
                runtime
                    .service
                    .handle_classify_image(EntityId::new(asset_id.clone()))
                    .await?;
            }
            Feature::Clip => {
                runtime
                    .service
                    .handle_encode_clip(EntityId::new(asset_id.clone()))
                    .await?;
            }
        }

        match runtime.store.find_smart_info(&asset_id).await? {
            Some(info) => {
                println!("Asset {asset_id}:");
                match info.tags {
                    Some(tags) if tags.is_empty() => println!("  Tags: (none)"),
                    Some(tags) => println!("  Tags: {}", tags.join(", ")),
                    None => println!("  Tags: (not classified)"),
                }
                match info.clip_embedding {
                    Some(embedding) => {
                        println!("  CLIP embedding: {} dimensions", embedding.len());
                    }
                    None => println!("  CLIP embedding: (not encoded)"),
                }
            }
            None => println!("Asset {asset_id}: no smart info stored"),
        }
        Ok(())
    }
}
