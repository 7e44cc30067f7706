use clap::Subcommand;
use enricher_config::Config;
use enricher_core::SystemConfigKey;

use super::Runtime;

/// Edits to the system config overrides stored in the database.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Override one key, e.g. `machineLearning.clip.enabled false`
    Set {
        /// Dotted config key
        key: SystemConfigKey,
        /// JSON value, e.g. `0.5`, `true` or `"\"ViT-L-14::openai\""`
        value: String,
    },
    /// Drop the override of one key so the default applies again
    Reset {
        /// Dotted config key
        key: SystemConfigKey,
    },
}

/// Strategy for editing runtime-toggleable settings.
///
/// Changes take effect for the next job that runs; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct ConfigStrategy;

impl super::CommandStrategy for ConfigStrategy {
    type Input = ConfigAction;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let runtime = Runtime::connect(&config).await?;

        let effective = match input {
            ConfigAction::Set { key, value } => {
                let value: serde_json::Value = serde_json::from_str(&value)
                    .map_err(|e| anyhow::anyhow!("Value for {key} is not valid JSON: {e}"))?;
                runtime.config_core.set_value(key, value).await?
            }
            ConfigAction::Reset { key } => runtime.config_core.reset_value(key).await?,
        };

        println!("{}", serde_json::to_string_pretty(&effective)?);
        Ok(())
    }
}
