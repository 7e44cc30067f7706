use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::key::SystemConfigKey;
use super::types::{SystemConfig, SystemConfigEntry};

/// Storage of config overrides. Keys absent from storage use the defaults.
#[async_trait]
pub trait SystemConfigRepo: Send + Sync {
    async fn load(&self) -> anyhow::Result<Vec<SystemConfigEntry>>;

    async fn save_all(&self, entries: &[SystemConfigEntry]) -> anyhow::Result<()>;

    async fn delete_keys(&self, keys: &[SystemConfigKey]) -> anyhow::Result<()>;
}

/// Builds the effective [`SystemConfig`] from defaults plus stored overrides.
#[derive(Clone)]
pub struct SystemConfigCore {
    repo: Arc<dyn SystemConfigRepo>,
    defaults: SystemConfig,
}

impl SystemConfigCore {
    #[must_use]
    pub fn new(repo: Arc<dyn SystemConfigRepo>, defaults: SystemConfig) -> Self {
        Self { repo, defaults }
    }

    pub async fn get_config(&self) -> anyhow::Result<SystemConfig> {
        let overrides = self.repo.load().await?;
        let mut config = self.defaults.clone();
        for entry in &overrides {
            config.apply(entry)?;
        }
        debug!("Loaded system config with {} override(s)", overrides.len());
        Ok(config)
    }

    /// Persist `config` as the new effective configuration.
    ///
    /// Only values that differ from the defaults are stored; keys whose value
    /// equals the default are removed from storage.
    pub async fn update_config(&self, config: &SystemConfig) -> anyhow::Result<SystemConfig> {
        let mut changed = Vec::new();
        let mut reset = Vec::new();
        for key in SystemConfigKey::ALL {
            let value = config.value_of(key);
            if value == self.defaults.value_of(key) {
                reset.push(key);
            } else {
                changed.push(SystemConfigEntry { key, value });
            }
        }

        if !changed.is_empty() {
            self.repo.save_all(&changed).await?;
        }
        if !reset.is_empty() {
            self.repo.delete_keys(&reset).await?;
        }
        info!(
            "Updated system config: {} override(s) stored, {} key(s) at default",
            changed.len(),
            reset.len()
        );

        self.get_config().await
    }

    pub async fn set_value(&self, key: SystemConfigKey, value: Value) -> anyhow::Result<SystemConfig> {
        let mut config = self.get_config().await?;
        config.apply(&SystemConfigEntry { key, value })?;
        self.update_config(&config).await
    }

    pub async fn reset_value(&self, key: SystemConfigKey) -> anyhow::Result<SystemConfig> {
        let mut config = self.get_config().await?;
        config.apply(&SystemConfigEntry {
            key,
            value: self.defaults.value_of(key),
        })?;
        self.update_config(&config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system_config::SystemConfigError;
    use crate::testing::FakeSystemConfigRepo;
    use serde_json::json;

    fn core(repo: &Arc<FakeSystemConfigRepo>) -> SystemConfigCore {
        SystemConfigCore::new(repo.clone(), SystemConfig::default())
    }

    #[tokio::test]
    async fn no_overrides_yields_defaults() {
        let repo = Arc::new(FakeSystemConfigRepo::empty());
        let config = core(&repo).get_config().await.unwrap();
        assert_eq!(config, SystemConfig::default());
    }

    #[tokio::test]
    async fn config_is_reloaded_on_every_read() {
        let repo = Arc::new(FakeSystemConfigRepo::empty());
        let core = core(&repo);

        assert!(core.get_config().await.unwrap().machine_learning.enabled);

        repo.set_entries(vec![SystemConfigEntry::new(
            SystemConfigKey::MachineLearningEnabled,
            false,
        )])
        .await;

        assert!(!core.get_config().await.unwrap().machine_learning.enabled);
        assert_eq!(repo.load_calls(), 2);
    }

    #[tokio::test]
    async fn invalid_stored_value_is_an_error() {
        let repo = Arc::new(FakeSystemConfigRepo::with_entries(vec![
            SystemConfigEntry::new(SystemConfigKey::ClassificationMinScore, "high"),
        ]));
        let err = core(&repo).get_config().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SystemConfigError>(),
            Some(SystemConfigError::InvalidValue { .. })
        ));
    }

    #[tokio::test]
    async fn update_stores_only_differences() {
        let repo = Arc::new(FakeSystemConfigRepo::with_entries(vec![
            SystemConfigEntry::new(SystemConfigKey::ClipModelName, "ViT-L-14::openai"),
        ]));
        let core = core(&repo);

        let mut desired = SystemConfig::default();
        desired.machine_learning.classification.min_score = 0.7;

        let updated = core.update_config(&desired).await.unwrap();

        assert_eq!(updated, desired);
        assert_eq!(
            repo.entries().await,
            vec![SystemConfigEntry::new(
                SystemConfigKey::ClassificationMinScore,
                json!(0.7)
            )]
        );
    }

    #[tokio::test]
    async fn set_then_reset_value() {
        let repo = Arc::new(FakeSystemConfigRepo::empty());
        let core = core(&repo);

        let config = core
            .set_value(SystemConfigKey::MachineLearningEnabled, json!(false))
            .await
            .unwrap();
        assert!(!config.machine_learning.enabled);
        assert_eq!(repo.entries().await.len(), 1);

        let config = core
            .reset_value(SystemConfigKey::MachineLearningEnabled)
            .await
            .unwrap();
        assert!(config.machine_learning.enabled);
        assert!(repo.entries().await.is_empty());
    }
}
