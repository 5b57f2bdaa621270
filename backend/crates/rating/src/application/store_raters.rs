//! Store Raters Use Case

use std::sync::Arc;

use auth::models::user_role::UserRole;
use auth::{AuthError, Identity};
use kernel::id::StoreId;
use kernel::pagination::{Page, PageRequest};

use crate::domain::entity::store::Rater;
use crate::domain::repository::StoreRepository;
use crate::error::{RatingError, RatingResult};

/// Users who rated a store. ADMIN sees any store, a STORE_OWNER only
/// their own.
pub struct StoreRatersUseCase<R>
where
    R: StoreRepository,
{
    repo: Arc<R>,
}

impl<R> StoreRatersUseCase<R>
where
    R: StoreRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        store: StoreId,
        viewer: &Identity,
        page: PageRequest,
    ) -> RatingResult<Page<Rater>> {
        if self.repo.find_by_id(store).await?.is_none() {
            return Err(RatingError::StoreNotFound);
        }

        match viewer.role {
            UserRole::Admin => {}
            UserRole::StoreOwner => {
                let owned = self.repo.find_by_owner(viewer.id).await?;
                if owned.map(|s| s.id) != Some(store) {
                    return Err(RatingError::NotYourStore);
                }
            }
            UserRole::User => return Err(AuthError::Forbidden.into()),
        }

        self.repo.raters(store, page).await
    }
}
