//! Dashboard Use Cases

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use kernel::id::UserId;
use kernel::pagination::{Page, PageRequest};

use crate::domain::entity::store::{Rater, StoreSummary};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::error::{RatingError, RatingResult};

/// System-wide totals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemTotals {
    pub users: i64,
    pub stores: i64,
    pub ratings: i64,
}

/// A store owner's store and its raters
#[derive(Debug, Clone)]
pub struct OwnerDashboard {
    pub store: StoreSummary,
    pub raters: Page<Rater>,
}

pub struct DashboardUseCase<R, U>
where
    R: StoreRepository + RatingRepository,
    U: UserRepository,
{
    repo: Arc<R>,
    users: Arc<U>,
}

impl<R, U> DashboardUseCase<R, U>
where
    R: StoreRepository + RatingRepository,
    U: UserRepository,
{
    pub fn new(repo: Arc<R>, users: Arc<U>) -> Self {
        Self { repo, users }
    }

    pub async fn admin(&self) -> RatingResult<SystemTotals> {
        Ok(SystemTotals {
            users: self.users.count().await?,
            stores: self.repo.count_stores().await?,
            ratings: self.repo.count_ratings().await?,
        })
    }

    /// 店舗が割り当てられていなければ空のダッシュボードではなく 404
    pub async fn store_owner(&self, owner: UserId, page: PageRequest) -> RatingResult<OwnerDashboard> {
        let store = self
            .repo
            .find_by_owner(owner)
            .await?
            .ok_or(RatingError::NoStoreAssigned)?;

        let raters = self.repo.raters(store.id, page).await?;

        Ok(OwnerDashboard { store, raters })
    }
}
