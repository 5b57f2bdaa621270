//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{RatingId, StoreId, UserId};
use kernel::pagination::{Page, PageRequest};

use crate::domain::entity::rating::{
    Rating, RatingDetail, RatingFilter, RatingListItem, SubmitOutcome,
};
use crate::domain::entity::store::{NewStore, Rater, StoreChanges, StoreFilter, StoreSummary};
use crate::domain::value_object::rating_value::RatingValue;
use crate::error::RatingResult;

/// Store repository trait
#[trait_variant::make(StoreRepository: Send)]
pub trait LocalStoreRepository {
    /// Filtered, paginated listing with rating aggregates
    async fn list(&self, filter: &StoreFilter, page: PageRequest)
    -> RatingResult<Page<StoreSummary>>;

    /// Find store with its aggregate by ID
    async fn find_by_id(&self, id: StoreId) -> RatingResult<Option<StoreSummary>>;

    /// The store owned by `owner`, if any
    async fn find_by_owner(&self, owner: UserId) -> RatingResult<Option<StoreSummary>>;

    /// Insert a store and return its generated id
    async fn create(&self, store: &NewStore) -> RatingResult<StoreId>;

    /// Apply a partial update, bumping `updated_at`
    async fn update(&self, id: StoreId, changes: &StoreChanges) -> RatingResult<()>;

    /// Delete a store (its ratings cascade); returns whether a row was removed
    async fn delete(&self, id: StoreId) -> RatingResult<bool>;

    /// Users who rated `store`, paginated
    async fn raters(&self, store: StoreId, page: PageRequest) -> RatingResult<Page<Rater>>;

    /// Total number of stores
    async fn count_stores(&self) -> RatingResult<i64>;
}

/// Rating repository trait
#[trait_variant::make(RatingRepository: Send)]
pub trait LocalRatingRepository {
    /// Insert or replace the (user, store) rating in one atomic write
    async fn upsert(
        &self,
        user: UserId,
        store: StoreId,
        value: RatingValue,
    ) -> RatingResult<(RatingId, SubmitOutcome)>;

    /// Rating joined with user and store names
    async fn find_detail(&self, id: RatingId) -> RatingResult<Option<RatingDetail>>;

    /// The caller's own rating for a store
    async fn find_by_user_and_store(
        &self,
        user: UserId,
        store: StoreId,
    ) -> RatingResult<Option<Rating>>;

    /// `user`'s rating for each of `stores` that they have rated
    async fn ratings_by_user(
        &self,
        user: UserId,
        stores: &[StoreId],
    ) -> RatingResult<Vec<(StoreId, RatingValue)>>;

    /// Filtered, paginated admin listing
    async fn search(
        &self,
        filter: &RatingFilter,
        page: PageRequest,
    ) -> RatingResult<Page<RatingListItem>>;

    /// Total number of ratings
    async fn count_ratings(&self) -> RatingResult<i64>;
}
