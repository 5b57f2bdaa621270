//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;
mod rate_limit;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthConfig, PgUserRepository, auth_router, user_router};
use axum::{
    Json, Router,
    extract::OriginalUri,
    http::{self, Method, header},
    middleware,
    routing::get,
};
use chrono::Utc;
use rating::{PgRatingRepository, dashboard_router, rating_router, store_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;
use crate::rate_limit::{PgRateLimitStore, RateLimitState};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const API_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";
const AUTH_LIMIT_MESSAGE: &str = "Too many login attempts, please try again later.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,rating=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .min_connections(api_config.pool_min)
        .max_connections(api_config.pool_max)
        .connect(&api_config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: drop counters from finished windows
    // Errors here should not prevent server startup
    let limit_store = PgRateLimitStore::new(pool.clone());
    let oldest_live = api_config
        .api_limit
        .window_start(Utc::now().timestamp_millis())
        .min(api_config.auth_limit.window_start(Utc::now().timestamp_millis()));
    match limit_store.cleanup_expired(oldest_live).await {
        Ok(deleted) => {
            tracing::info!(rate_limits_deleted = deleted, "Rate limit cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rate limit cleanup failed, continuing anyway");
        }
    }

    let limit_store = Arc::new(limit_store);
    let api_limiter = RateLimitState::new(
        limit_store.clone(),
        api_config.api_limit.clone(),
        API_LIMIT_MESSAGE,
    );
    let auth_limiter = RateLimitState::new(
        limit_store,
        api_config.auth_limit.clone(),
        AUTH_LIMIT_MESSAGE,
    );

    let users = PgUserRepository::new(pool.clone());
    let ratings = PgRatingRepository::new(pool.clone());

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = api_config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let auth_routes = auth_router(users.clone(), auth_config.clone()).layer(
        middleware::from_fn_with_state(auth_limiter, rate_limit::rate_limit::<PgRateLimitStore>),
    );

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_router(users.clone(), auth_config.clone()))
        .nest(
            "/stores",
            store_router(ratings.clone(), users.clone(), auth_config.clone()),
        )
        .nest(
            "/ratings",
            rating_router(ratings.clone(), users.clone(), auth_config.clone()),
        )
        .nest("/dashboard", dashboard_router(ratings, users, auth_config))
        .layer(middleware::from_fn_with_state(
            api_limiter,
            rate_limit::rate_limit::<PgRateLimitStore>,
        ));

    let app = with_fallbacks(Router::new().route("/health", get(health)).nest("/api", api))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], api_config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "UP" }))
}

/// Unknown paths and unsupported methods both answer with the 404 envelope
fn with_fallbacks(router: Router) -> Router {
    router
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), |pq| pq.as_str().to_owned());
    AppError::not_found(format!("Not Found - {target}"))
}
