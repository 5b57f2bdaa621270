//! Rating Routers
//!
//! `/api/stores`, `/api/ratings` and `/api/dashboard`. Store reads are
//! public but personalised when a token is offered; everything else is
//! gated by role.

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use auth::AuthConfig;
use auth::PgUserRepository;
use auth::domain::repository::UserRepository;
use auth::middleware::{AuthMiddlewareState, personalised, protect};
use auth::models::user_role::{ADMIN_ONLY, ADMIN_OR_STORE_OWNER, STORE_OWNER_ONLY, USER_ONLY};

use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::infra::postgres::PgRatingRepository;
use crate::presentation::handlers::{self, RatingAppState};

/// Create the store router with PostgreSQL repositories
pub fn store_router(repo: PgRatingRepository, users: PgUserRepository, config: AuthConfig) -> Router {
    store_router_generic(Arc::new(repo), Arc::new(users), Arc::new(config))
}

/// Create the rating router with PostgreSQL repositories
pub fn rating_router(repo: PgRatingRepository, users: PgUserRepository, config: AuthConfig) -> Router {
    rating_router_generic(Arc::new(repo), Arc::new(users), Arc::new(config))
}

/// Create the dashboard router with PostgreSQL repositories
pub fn dashboard_router(
    repo: PgRatingRepository,
    users: PgUserRepository,
    config: AuthConfig,
) -> Router {
    dashboard_router_generic(Arc::new(repo), Arc::new(users), Arc::new(config))
}

/// Create a generic store router for any repository implementation
pub fn store_router_generic<R, U>(repo: Arc<R>, users: Arc<U>, config: Arc<AuthConfig>) -> Router
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let guard = AuthMiddlewareState::new(users.clone(), config);
    let state = RatingAppState { repo, users };

    Router::new()
        .route(
            "/",
            personalised(get(handlers::list_stores::<R, U>), &guard).merge(protect(
                post(handlers::create_store::<R, U>),
                &guard,
                ADMIN_ONLY,
            )),
        )
        .route(
            "/{id}",
            personalised(get(handlers::get_store::<R, U>), &guard).merge(protect(
                put(handlers::update_store::<R, U>).delete(handlers::delete_store::<R, U>),
                &guard,
                ADMIN_ONLY,
            )),
        )
        .route(
            "/{id}/raters",
            protect(get(handlers::store_raters::<R, U>), &guard, ADMIN_OR_STORE_OWNER),
        )
        .with_state(state)
}

/// Create a generic rating router
pub fn rating_router_generic<R, U>(repo: Arc<R>, users: Arc<U>, config: Arc<AuthConfig>) -> Router
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let guard = AuthMiddlewareState::new(users.clone(), config);
    let state = RatingAppState { repo, users };

    Router::new()
        .route(
            "/",
            protect(get(handlers::list_ratings::<R, U>), &guard, ADMIN_ONLY).merge(protect(
                post(handlers::submit_rating::<R, U>),
                &guard,
                USER_ONLY,
            )),
        )
        .route(
            "/count",
            protect(get(handlers::count_ratings::<R, U>), &guard, ADMIN_ONLY),
        )
        .route(
            "/store/{store_id}",
            protect(get(handlers::my_rating::<R, U>), &guard, USER_ONLY),
        )
        .with_state(state)
}

/// Create a generic dashboard router
pub fn dashboard_router_generic<R, U>(
    repo: Arc<R>,
    users: Arc<U>,
    config: Arc<AuthConfig>,
) -> Router
where
    R: StoreRepository + RatingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let guard = AuthMiddlewareState::new(users.clone(), config);
    let state = RatingAppState { repo, users };

    Router::new()
        .route(
            "/admin",
            protect(get(handlers::admin_dashboard::<R, U>), &guard, ADMIN_ONLY),
        )
        .route(
            "/store-owner",
            protect(
                get(handlers::store_owner_dashboard::<R, U>),
                &guard,
                STORE_OWNER_ONLY,
            ),
        )
        .with_state(state)
}
