use thiserror::Error;

use super::key::SystemConfigKey;

#[derive(Debug, Error)]
pub enum SystemConfigError {
    #[error("Unknown system config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: expected {expected}, got {value}")]
    InvalidValue {
        key: SystemConfigKey,
        expected: &'static str,
        value: serde_json::Value,
    },
}
