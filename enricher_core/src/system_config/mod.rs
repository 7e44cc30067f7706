//! Runtime feature flags and model parameters.
//!
//! Stored overrides are overlaid on defaults on every read. Nothing is
//! cached, so a toggle takes effect for the next job that runs.

mod config_core;
mod error;
mod key;
mod types;

pub use config_core::{SystemConfigCore, SystemConfigRepo};
pub use error::SystemConfigError;
pub use key::SystemConfigKey;
pub use types::{
    ClassificationConfig, ClipConfig, DEFAULT_MACHINE_LEARNING_URL, MachineLearningConfig,
    SystemConfig, SystemConfigEntry,
};
