//! Store Browsing Use Case
//!
//! Public listing and detail. When the caller is signed in, each store also
//! carries the caller's own rating, fetched in a second query restricted to
//! the page's store ids so the aggregate join is never multiplied.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{StoreId, UserId};
use kernel::pagination::{Page, PageRequest};

use crate::domain::entity::store::{StoreFilter, StoreSummary};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::domain::value_object::rating_value::RatingValue;
use crate::error::{RatingError, RatingResult};

/// A store as seen by a particular caller
///
/// `user_rating` is `None` for anonymous callers and `Some(None)` for a
/// signed-in caller who has not rated the store.
#[derive(Debug, Clone)]
pub struct StoreView {
    pub store: StoreSummary,
    pub user_rating: Option<Option<RatingValue>>,
}

pub struct BrowseStoresUseCase<R>
where
    R: StoreRepository + RatingRepository,
{
    repo: Arc<R>,
}

impl<R> BrowseStoresUseCase<R>
where
    R: StoreRepository + RatingRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        filter: StoreFilter,
        page: PageRequest,
        viewer: Option<UserId>,
    ) -> RatingResult<Page<StoreView>> {
        let stores = self.repo.list(&filter, page).await?;

        let Some(viewer) = viewer else {
            return Ok(stores.map(|store| StoreView {
                store,
                user_rating: None,
            }));
        };

        let ids: Vec<StoreId> = stores.items.iter().map(|s| s.id).collect();
        let mine: HashMap<StoreId, RatingValue> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.repo
                .ratings_by_user(viewer, &ids)
                .await?
                .into_iter()
                .collect()
        };

        Ok(stores.map(|store| StoreView {
            user_rating: Some(mine.get(&store.id).copied()),
            store,
        }))
    }

    pub async fn get(&self, id: StoreId, viewer: Option<UserId>) -> RatingResult<StoreView> {
        let store = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(RatingError::StoreNotFound)?;

        let user_rating = match viewer {
            Some(viewer) => Some(
                self.repo
                    .find_by_user_and_store(viewer, id)
                    .await?
                    .map(|r| r.rating_value),
            ),
            None => None,
        };

        Ok(StoreView { store, user_rating })
    }
}
