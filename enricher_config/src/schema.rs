use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use enricher_core::system_config::DEFAULT_MACHINE_LEARNING_URL;

/// Process bootstrap settings read from `~/enricher/config.json`.
///
/// Runtime-editable settings live in the database as system config
/// overrides; this file only says where to find the database and the
/// default inference endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub machine_learning: MachineLearningEndpoint,
    #[serde(default)]
    pub jobs: JobsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl DatabaseConfig {
    fn default_url() -> String {
        "sqlite://enricher.db?mode=rwc".to_string()
    }
}

/// Default inference service location; a stored `machineLearning.url`
/// override takes precedence.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MachineLearningEndpoint {
    #[serde(default = "MachineLearningEndpoint::default_url")]
    pub url: String,
}

impl Default for MachineLearningEndpoint {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl MachineLearningEndpoint {
    fn default_url() -> String {
        DEFAULT_MACHINE_LEARNING_URL.to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct JobsConfig {
    /// Maximum number of jobs the worker pool runs at once.
    #[serde(default = "JobsConfig::default_concurrency")]
    pub concurrency: usize,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            concurrency: Self::default_concurrency(),
        }
    }
}

impl JobsConfig {
    const fn default_concurrency() -> usize {
        4
    }
}

impl Config {
    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("enricher"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'enricher init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let template = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(&config_path, template)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Point database.url at the asset library database");
        println!("   2. Ensure the machine learning service is reachable at machine_learning.url");
        println!("   3. Run 'enricher queue tags' to tag every asset without tags");
        println!();
        println!("🔧 Configuration options:");
        println!("   - jobs.concurrency: Number of jobs run at once");
        println!("   - Model settings are stored in the database, see 'enricher config set'");
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.database.url, "sqlite://enricher.db?mode=rwc");
        assert_eq!(config.machine_learning.url, "http://machine-learning:3003");
        assert_eq!(config.jobs.concurrency, 4);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "database": { "url": "postgres://localhost/library" }, "jobs": {} }"#,
        )
        .unwrap();
        assert_eq!(config.database.url, "postgres://localhost/library");
        assert_eq!(config.jobs.concurrency, 4);
        assert_eq!(config.machine_learning, MachineLearningEndpoint::default());
    }

    #[test]
    fn template_parses_back_to_defaults() {
        let template = serde_json::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = serde_json::from_str(&template).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn load_from_reads_file() {
        let path = std::env::temp_dir().join(format!("enricher-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "jobs": { "concurrency": 8 } }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.jobs.concurrency, 8);
    }
}
