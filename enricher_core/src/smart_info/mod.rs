mod repository;
mod service;
mod types;

pub use repository::{MachineLearningRepo, SmartInfoRepo};
pub use service::SmartInfoService;
pub use types::{SmartInfo, SmartInfoField, SmartInfoUpdate, VisionModelInput};
