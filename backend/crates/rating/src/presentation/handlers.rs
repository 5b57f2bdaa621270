//! HTTP Handlers

use axum::extract::State;
use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::middleware::{CurrentUser, MaybeUser};
use kernel::extract::{ApiJson, ApiPath, ApiQuery};
use kernel::id::StoreId;
use kernel::pagination::PageQuery;
use kernel::response::ApiResponse;

use crate::application::{
    BrowseStoresUseCase, DashboardUseCase, ManageStoresUseCase, ReviewRatingsUseCase,
    StoreRatersUseCase, SubmitRatingUseCase,
};
use crate::domain::entity::rating::{Rating, RatingDetail, RatingListItem};
use crate::domain::entity::store::Rater;
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::error::RatingResult;
use crate::presentation::dto::{
    AdminDashboardResponse, CountResponse, CreateStoreRequest, RatingListQuery,
    StoreDetailResponse, StoreListItem, StoreListQuery, StoreOwnerDashboardResponse,
    SubmitRatingRequest, UpdateStoreRequest,
};

/// Shared state for rating handlers
#[derive(Clone)]
pub struct RatingAppState<R, U>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub users: Arc<U>,
}

// ============================================================================
// Stores
// ============================================================================

/// GET /api/stores
pub async fn list_stores<R, U>(
    State(state): State<RatingAppState<R, U>>,
    MaybeUser(viewer): MaybeUser,
    ApiQuery(filter): ApiQuery<StoreListQuery>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> RatingResult<ApiResponse<Vec<StoreListItem>>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let page = page.parse()?;

    let stores = BrowseStoresUseCase::new(state.repo.clone())
        .list(filter.into(), page, viewer.map(|v| v.id))
        .await?;

    Ok(ApiResponse::page(stores.map(StoreListItem::from)))
}

/// GET /api/stores/{id}
pub async fn get_store<R, U>(
    State(state): State<RatingAppState<R, U>>,
    MaybeUser(viewer): MaybeUser,
    ApiPath(id): ApiPath<StoreId>,
) -> RatingResult<ApiResponse<StoreDetailResponse>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let view = BrowseStoresUseCase::new(state.repo.clone())
        .get(id, viewer.map(|v| v.id))
        .await?;

    Ok(ApiResponse::ok(view.into()))
}

/// POST /api/stores
pub async fn create_store<R, U>(
    State(state): State<RatingAppState<R, U>>,
    ApiJson(req): ApiJson<CreateStoreRequest>,
) -> RatingResult<ApiResponse<StoreDetailResponse>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate()?;

    let view = ManageStoresUseCase::new(state.repo.clone(), state.users.clone())
        .create(input)
        .await?;

    Ok(ApiResponse::created(view.into()).with_message("Store created successfully"))
}

/// PUT /api/stores/{id}
pub async fn update_store<R, U>(
    State(state): State<RatingAppState<R, U>>,
    ApiPath(id): ApiPath<StoreId>,
    ApiJson(req): ApiJson<UpdateStoreRequest>,
) -> RatingResult<ApiResponse<StoreDetailResponse>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate()?;

    let view = ManageStoresUseCase::new(state.repo.clone(), state.users.clone())
        .update(id, input)
        .await?;

    Ok(ApiResponse::ok(view.into()).with_message("Store updated successfully"))
}

/// DELETE /api/stores/{id}
pub async fn delete_store<R, U>(
    State(state): State<RatingAppState<R, U>>,
    ApiPath(id): ApiPath<StoreId>,
) -> RatingResult<ApiResponse<()>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    ManageStoresUseCase::new(state.repo.clone(), state.users.clone())
        .delete(id)
        .await?;

    Ok(ApiResponse::message("Store deleted successfully"))
}

/// GET /api/stores/{id}/raters
pub async fn store_raters<R, U>(
    State(state): State<RatingAppState<R, U>>,
    CurrentUser(identity): CurrentUser,
    ApiPath(id): ApiPath<StoreId>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> RatingResult<ApiResponse<Vec<Rater>>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let page = page.parse()?;

    let raters = StoreRatersUseCase::new(state.repo.clone())
        .execute(id, &identity, page)
        .await?;

    Ok(ApiResponse::page(raters))
}

// ============================================================================
// Ratings
// ============================================================================

/// GET /api/ratings
pub async fn list_ratings<R, U>(
    State(state): State<RatingAppState<R, U>>,
    ApiQuery(filter): ApiQuery<RatingListQuery>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> RatingResult<ApiResponse<Vec<RatingListItem>>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let page = page.parse()?;
    let filter = filter.validate()?;

    let ratings = ReviewRatingsUseCase::new(state.repo.clone())
        .list(filter, page)
        .await?;

    Ok(ApiResponse::page(ratings))
}

/// POST /api/ratings
///
/// 初回も再送信も 200。メッセージで区別する
pub async fn submit_rating<R, U>(
    State(state): State<RatingAppState<R, U>>,
    CurrentUser(identity): CurrentUser,
    ApiJson(req): ApiJson<SubmitRatingRequest>,
) -> RatingResult<ApiResponse<RatingDetail>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate(identity.id)?;

    let (detail, outcome) = SubmitRatingUseCase::new(state.repo.clone())
        .execute(input)
        .await?;

    Ok(ApiResponse::ok(detail).with_message(outcome.message()))
}

/// GET /api/ratings/store/{store_id}
pub async fn my_rating<R, U>(
    State(state): State<RatingAppState<R, U>>,
    CurrentUser(identity): CurrentUser,
    ApiPath(store_id): ApiPath<StoreId>,
) -> RatingResult<ApiResponse<Rating>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let rating = ReviewRatingsUseCase::new(state.repo.clone())
        .mine(identity.id, store_id)
        .await?;

    Ok(ApiResponse::ok(rating))
}

/// GET /api/ratings/count
pub async fn count_ratings<R, U>(
    State(state): State<RatingAppState<R, U>>,
) -> RatingResult<ApiResponse<CountResponse>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let count = ReviewRatingsUseCase::new(state.repo.clone()).count().await?;
    Ok(ApiResponse::ok(CountResponse { count }))
}

// ============================================================================
// Dashboards
// ============================================================================

/// GET /api/dashboard/admin
pub async fn admin_dashboard<R, U>(
    State(state): State<RatingAppState<R, U>>,
) -> RatingResult<ApiResponse<AdminDashboardResponse>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let totals = DashboardUseCase::new(state.repo.clone(), state.users.clone())
        .admin()
        .await?;

    Ok(ApiResponse::ok(totals.into()))
}

/// GET /api/dashboard/store-owner
pub async fn store_owner_dashboard<R, U>(
    State(state): State<RatingAppState<R, U>>,
    CurrentUser(identity): CurrentUser,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> RatingResult<ApiResponse<StoreOwnerDashboardResponse>>
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let page = page.parse()?;

    let dashboard = DashboardUseCase::new(state.repo.clone(), state.users.clone())
        .store_owner(identity.id, page)
        .await?;

    Ok(ApiResponse::ok(dashboard.into()))
}
