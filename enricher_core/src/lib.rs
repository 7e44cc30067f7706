#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod asset;
pub mod job;
pub mod smart_info;
pub mod system_config;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use asset::{
    Asset, AssetId, AssetPager, AssetRepo, AssetSelection, JOBS_ASSET_PAGINATION_SIZE, Page,
    PageRequest, WithoutProperty,
};
pub use job::{EntityId, JobItem, JobName, JobOptions, JobQueue};
pub use smart_info::{
    MachineLearningRepo, SmartInfo, SmartInfoField, SmartInfoRepo, SmartInfoService,
    SmartInfoUpdate, VisionModelInput,
};
pub use system_config::{
    ClassificationConfig, ClipConfig, MachineLearningConfig, SystemConfig, SystemConfigCore,
    SystemConfigEntry, SystemConfigError, SystemConfigKey, SystemConfigRepo,
};
