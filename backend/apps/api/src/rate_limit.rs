//! Per-client rate limiting
//!
//! Fixed-window counters kept in Postgres, one row per
//! (bucket, client, window). A storage failure lets the request through.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use kernel::error::app_error::AppError;
use platform::client::client_key;
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};
use sqlx::PgPool;

/// PostgreSQL-backed counter store
#[derive(Clone)]
pub struct PgRateLimitStore {
    pool: PgPool,
}

impl PgRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drop windows that ended before `older_than_ms`
    pub async fn cleanup_expired(&self, older_than_ms: i64) -> Result<u64, sqlx::Error> {
        let deleted = sqlx::query("DELETE FROM rate_limits WHERE window_start_ms < $1")
            .bind(older_than_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

impl RateLimitStore for PgRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let window_start = config.window_start(Utc::now().timestamp_millis());

        let (count,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO rate_limits (bucket, client_key, window_start_ms, request_count)
            VALUES ($1, $2, $3, 1)
            ON CONFLICT (bucket, client_key, window_start_ms)
            DO UPDATE SET request_count = rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(config.bucket)
        .bind(key)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(config.evaluate(u32::try_from(count).unwrap_or(u32::MAX), window_start))
    }
}

/// Middleware state: one limiter with its rejection message
#[derive(Clone)]
pub struct RateLimitState<S>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<RateLimitConfig>,
    pub message: &'static str,
}

impl<S> RateLimitState<S>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, config: RateLimitConfig, message: &'static str) -> Self {
        Self {
            store,
            config: Arc::new(config),
            message,
        }
    }
}

/// Count the request against the caller's window; 429 once over quota
pub async fn rate_limit<S>(
    State(state): State<RateLimitState<S>>,
    req: Request,
    next: Next,
) -> Response
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let key = client_key(req.headers(), peer);

    let result = match state.store.check_and_increment(&key, &state.config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, bucket = state.config.bucket, "Rate limiter unavailable, allowing request");
            return next.run(req).await;
        }
    };

    if !result.allowed {
        tracing::warn!(
            client = %key,
            bucket = state.config.bucket,
            max = state.config.max_requests,
            "Rate limit exceeded"
        );
        let mut response = AppError::too_many_requests(state.message).into_response();
        insert_limit_headers(&mut response, &state.config, &result);
        return response;
    }

    let mut response = next.run(req).await;
    insert_limit_headers(&mut response, &state.config, &result);
    response
}

/// `RateLimit-*` headers (draft IETF names)
fn insert_limit_headers(response: &mut Response, config: &RateLimitConfig, result: &RateLimitResult) {
    let reset_secs = (result.reset_at_ms - Utc::now().timestamp_millis()).max(0) / 1000;
    let headers = response.headers_mut();
    headers.insert("ratelimit-limit", HeaderValue::from(config.max_requests));
    headers.insert("ratelimit-remaining", HeaderValue::from(result.remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(reset_secs));
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Clone, Default)]
    struct MemoryCounters {
        counts: Arc<Mutex<HashMap<(String, i64), u32>>>,
        broken: bool,
    }

    impl RateLimitStore for MemoryCounters {
        async fn check_and_increment(
            &self,
            key: &str,
            config: &RateLimitConfig,
        ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
            if self.broken {
                return Err("counter table unavailable".into());
            }
            let window_start = config.window_start(Utc::now().timestamp_millis());
            let mut counts = self.counts.lock().unwrap();
            let count = counts.entry((key.to_owned(), window_start)).or_default();
            *count += 1;
            Ok(config.evaluate(*count, window_start))
        }
    }

    fn app(store: MemoryCounters, max: u32) -> Router {
        let state = RateLimitState::new(
            Arc::new(store),
            RateLimitConfig::new("test", max, Duration::from_secs(60)),
            "Too many requests, please try again later.",
        );
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn_with_state(state, rate_limit::<MemoryCounters>))
    }

    fn ping(client: &str) -> Request<Body> {
        Request::builder()
            .uri("/ping")
            .header("x-forwarded-for", client)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_blocks_after_quota() {
        let app = app(MemoryCounters::default(), 2);

        for _ in 0..2 {
            let response = app.clone().oneshot(ping("10.0.0.1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.clone().oneshot(ping("10.0.0.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["ratelimit-remaining"], "0");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Too many requests, please try again later.");

        // Other clients have their own window
        let response = app.oneshot(ping("10.0.0.2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_storage_failure_allows_request() {
        let store = MemoryCounters {
            broken: true,
            ..Default::default()
        };
        let response = app(store, 1).oneshot(ping("10.0.0.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
