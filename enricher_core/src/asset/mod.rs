mod pagination;
mod repository;
mod types;

pub use pagination::{
    AssetPager, AssetSelection, JOBS_ASSET_PAGINATION_SIZE, Page, PageRequest,
};
pub use repository::AssetRepo;
pub use types::{Asset, AssetId, WithoutProperty};
