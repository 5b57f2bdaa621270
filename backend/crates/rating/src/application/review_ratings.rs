//! Rating Lookup Use Cases

use std::sync::Arc;

use kernel::id::{StoreId, UserId};
use kernel::pagination::{Page, PageRequest};

use crate::domain::entity::rating::{Rating, RatingFilter, RatingListItem};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::error::{RatingError, RatingResult};

/// Admin listing and counting, plus a caller's own rating for a store
pub struct ReviewRatingsUseCase<R>
where
    R: StoreRepository + RatingRepository,
{
    repo: Arc<R>,
}

impl<R> ReviewRatingsUseCase<R>
where
    R: StoreRepository + RatingRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        filter: RatingFilter,
        page: PageRequest,
    ) -> RatingResult<Page<RatingListItem>> {
        self.repo.search(&filter, page).await
    }

    pub async fn count(&self) -> RatingResult<i64> {
        self.repo.count_ratings().await
    }

    pub async fn mine(&self, user: UserId, store: StoreId) -> RatingResult<Rating> {
        if self.repo.find_by_id(store).await?.is_none() {
            return Err(RatingError::StoreNotFound);
        }

        self.repo
            .find_by_user_and_store(user, store)
            .await?
            .ok_or(RatingError::RatingNotFound)
    }
}
