//! Offset pagination over the asset store.
//!
//! Enqueue workflows walk the asset table in fixed-size pages so a library of
//! any size is never loaded in one round trip.

use tracing::debug;

use super::repository::AssetRepo;
use super::types::{Asset, WithoutProperty};

/// Page size used by every enqueue workflow.
pub const JOBS_ASSET_PAGINATION_SIZE: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u64,
    pub take: u64,
}

impl PageRequest {
    #[must_use]
    pub const fn first(take: u64) -> Self {
        Self { skip: 0, take }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            skip: self.skip + self.take,
            take: self.take,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_next_page: false,
        }
    }

    /// Build a page from a query that fetched up to `take + 1` rows.
    ///
    /// The extra row only signals that another page exists and is dropped.
    #[must_use]
    pub fn from_overfetch(mut items: Vec<T>, take: u64) -> Self {
        let take = usize::try_from(take).unwrap_or(usize::MAX);
        let has_next_page = items.len() > take;
        items.truncate(take);
        Self {
            items,
            has_next_page,
        }
    }
}

/// Which assets an enumeration walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSelection {
    All,
    Without(WithoutProperty),
}

/// Walks an [`AssetRepo`] page by page until a page reports no successor.
pub struct AssetPager<'a> {
    repo: &'a dyn AssetRepo,
    selection: AssetSelection,
    next: Option<PageRequest>,
}

impl<'a> AssetPager<'a> {
    #[must_use]
    pub fn new(repo: &'a dyn AssetRepo, selection: AssetSelection, take: u64) -> Self {
        Self {
            repo,
            selection,
            next: Some(PageRequest::first(take)),
        }
    }

    /// Fetch the next page, or `None` once the last page has been returned.
    pub async fn next_page(&mut self) -> anyhow::Result<Option<Vec<Asset>>> {
        let Some(request) = self.next else {
            return Ok(None);
        };

        let page = match self.selection {
            AssetSelection::All => self.repo.get_all(request).await?,
            AssetSelection::Without(property) => self.repo.get_without(request, property).await?,
        };

        debug!(
            "Fetched asset page skip={} take={} items={} has_next_page={}",
            request.skip,
            request.take,
            page.items.len(),
            page.has_next_page
        );

        self.next = page.has_next_page.then(|| request.next());
        Ok(Some(page.items))
    }
}
