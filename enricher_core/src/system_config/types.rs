use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::SystemConfigError;
use super::key::SystemConfigKey;

pub const DEFAULT_MACHINE_LEARNING_URL: &str = "http://machine-learning:3003";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationConfig {
    pub enabled: bool,
    /// Tags scoring below this confidence are dropped by the inference service.
    pub min_score: f64,
    pub model_name: String,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_score: 0.9,
            model_name: "microsoft/resnet-50".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipConfig {
    pub enabled: bool,
    pub model_name: String,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_name: "ViT-B-32::openai".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineLearningConfig {
    pub enabled: bool,
    pub url: String,
    pub classification: ClassificationConfig,
    pub clip: ClipConfig,
}

impl Default for MachineLearningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_MACHINE_LEARNING_URL.to_string(),
            classification: ClassificationConfig::default(),
            clip: ClipConfig::default(),
        }
    }
}

/// Effective configuration snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    pub machine_learning: MachineLearningConfig,
}

/// One stored override.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfigEntry {
    pub key: SystemConfigKey,
    pub value: Value,
}

impl SystemConfigEntry {
    #[must_use]
    pub fn new(key: SystemConfigKey, value: impl Into<Value>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

impl SystemConfig {
    #[must_use]
    pub fn with_machine_learning_url(url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.machine_learning.url = url.into();
        config
    }

    /// Overlay one stored override. `null` leaves the current value in place.
    pub fn apply(&mut self, entry: &SystemConfigEntry) -> Result<(), SystemConfigError> {
        if entry.value.is_null() {
            return Ok(());
        }

        let key = entry.key;
        let value = &entry.value;
        let ml = &mut self.machine_learning;
        match key {
            SystemConfigKey::MachineLearningEnabled => ml.enabled = expect_bool(key, value)?,
            SystemConfigKey::MachineLearningUrl => ml.url = expect_string(key, value)?,
            SystemConfigKey::ClassificationEnabled => {
                ml.classification.enabled = expect_bool(key, value)?;
            }
            SystemConfigKey::ClassificationMinScore => {
                ml.classification.min_score = expect_f64(key, value)?;
            }
            SystemConfigKey::ClassificationModelName => {
                ml.classification.model_name = expect_string(key, value)?;
            }
            SystemConfigKey::ClipEnabled => ml.clip.enabled = expect_bool(key, value)?,
            SystemConfigKey::ClipModelName => ml.clip.model_name = expect_string(key, value)?,
        }
        Ok(())
    }

    #[must_use]
    pub fn value_of(&self, key: SystemConfigKey) -> Value {
        let ml = &self.machine_learning;
        match key {
            SystemConfigKey::MachineLearningEnabled => Value::Bool(ml.enabled),
            SystemConfigKey::MachineLearningUrl => Value::String(ml.url.clone()),
            SystemConfigKey::ClassificationEnabled => Value::Bool(ml.classification.enabled),
            SystemConfigKey::ClassificationMinScore => Value::from(ml.classification.min_score),
            SystemConfigKey::ClassificationModelName => {
                Value::String(ml.classification.model_name.clone())
            }
            SystemConfigKey::ClipEnabled => Value::Bool(ml.clip.enabled),
            SystemConfigKey::ClipModelName => Value::String(ml.clip.model_name.clone()),
        }
    }
}

fn expect_bool(key: SystemConfigKey, value: &Value) -> Result<bool, SystemConfigError> {
    value.as_bool().ok_or_else(|| invalid(key, "boolean", value))
}

fn expect_f64(key: SystemConfigKey, value: &Value) -> Result<f64, SystemConfigError> {
    value.as_f64().ok_or_else(|| invalid(key, "number", value))
}

fn expect_string(key: SystemConfigKey, value: &Value) -> Result<String, SystemConfigError> {
    value
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| invalid(key, "string", value))
}

fn invalid(key: SystemConfigKey, expected: &'static str, value: &Value) -> SystemConfigError {
    SystemConfigError::InvalidValue {
        key,
        expected,
        value: value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_shipped_models() {
        let ml = SystemConfig::default().machine_learning;
        assert!(ml.enabled);
        assert_eq!(ml.url, DEFAULT_MACHINE_LEARNING_URL);
        assert_eq!(
            ml.classification,
            ClassificationConfig {
                enabled: true,
                min_score: 0.9,
                model_name: "microsoft/resnet-50".to_string(),
            }
        );
        assert_eq!(ml.clip.model_name, "ViT-B-32::openai");
    }

    #[test]
    fn apply_overrides_each_key() {
        let mut config = SystemConfig::default();
        for (key, value) in [
            (SystemConfigKey::MachineLearningEnabled, json!(false)),
            (SystemConfigKey::MachineLearningUrl, json!("http://ml:3003")),
            (SystemConfigKey::ClassificationMinScore, json!(0.5)),
            (SystemConfigKey::ClipModelName, json!("ViT-L-14::openai")),
        ] {
            config.apply(&SystemConfigEntry::new(key, value)).unwrap();
        }

        let ml = &config.machine_learning;
        assert!(!ml.enabled);
        assert_eq!(ml.url, "http://ml:3003");
        assert!((ml.classification.min_score - 0.5).abs() < f64::EPSILON);
        assert_eq!(ml.clip.model_name, "ViT-L-14::openai");
    }

    #[test]
    fn apply_rejects_wrong_type() {
        let mut config = SystemConfig::default();
        let err = config
            .apply(&SystemConfigEntry::new(
                SystemConfigKey::MachineLearningEnabled,
                "yes",
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            SystemConfigError::InvalidValue {
                key: SystemConfigKey::MachineLearningEnabled,
                expected: "boolean",
                ..
            }
        ));
    }

    #[test]
    fn null_override_keeps_default() {
        let mut config = SystemConfig::default();
        config
            .apply(&SystemConfigEntry::new(
                SystemConfigKey::ClassificationModelName,
                Value::Null,
            ))
            .unwrap();
        assert_eq!(config, SystemConfig::default());
    }

    #[test]
    fn value_of_round_trips_through_apply() {
        let mut source = SystemConfig::with_machine_learning_url("http://ml:1234");
        source.machine_learning.clip.enabled = false;

        let mut target = SystemConfig::default();
        for key in SystemConfigKey::ALL {
            target
                .apply(&SystemConfigEntry::new(key, source.value_of(key)))
                .unwrap();
        }
        assert_eq!(target, source);
    }
}
