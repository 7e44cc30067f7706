//! Database entities for assets, their derived metadata and config overrides.

pub mod assets;
pub mod smart_info;
pub mod system_config;
