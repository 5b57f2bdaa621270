//! Auth Router
//!
//! `/api/auth` (self-service) and `/api/users` (ADMIN user management).

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::ADMIN_ONLY;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, authenticated, protect};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    auth_router_generic(Arc::new(repo), Arc::new(config))
}

/// Create the user-management router with PostgreSQL repository
pub fn user_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    user_router_generic(Arc::new(repo), Arc::new(config))
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: Arc<R>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let guard = AuthMiddlewareState::new(repo.clone(), config.clone());
    let state = AuthAppState { repo, config };

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh-token", post(handlers::refresh_token::<R>))
        .route("/me", authenticated(get(handlers::me::<R>), &guard))
        .route(
            "/password",
            authenticated(put(handlers::change_password::<R>), &guard),
        )
        .route("/logout", authenticated(post(handlers::logout), &guard))
        .with_state(state)
}

/// Create a generic user-management router; every route is ADMIN only
pub fn user_router_generic<R>(repo: Arc<R>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let guard = AuthMiddlewareState::new(repo.clone(), config.clone());
    let state = AuthAppState { repo, config };

    Router::new()
        .route(
            "/",
            protect(
                get(handlers::list_users::<R>).post(handlers::create_user::<R>),
                &guard,
                ADMIN_ONLY,
            ),
        )
        .route(
            "/{id}",
            protect(
                get(handlers::get_user::<R>)
                    .put(handlers::update_user::<R>)
                    .delete(handlers::delete_user::<R>),
                &guard,
                ADMIN_ONLY,
            ),
        )
        .with_state(state)
}
