//! Access Control Middleware
//!
//! `require_auth` resolves the bearer token to an [`Identity`] and stores it
//! in the request extensions; `authorize` then checks the identity's role
//! against a route's allow-list. Handlers read the identity back through the
//! [`CurrentUser`] / [`MaybeUser`] extractors.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::MethodRouter;

use crate::application::config::AuthConfig;
use crate::application::{AuthenticateUseCase, Identity};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    async fn authenticate(&self, authorization: Option<String>) -> Result<Identity, AuthError> {
        AuthenticateUseCase::new(self.repo.clone(), self.config.clone())
            .execute(authorization.as_deref())
            .await
    }
}

fn authorization_header(req: &Request) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Middleware that requires a valid bearer token
pub async fn require_auth<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let identity = state.authenticate(authorization_header(&req)).await?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Middleware that attaches an identity when a valid token is present
/// and otherwise lets the request through anonymously
pub async fn optional_auth<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if let Some(header) = authorization_header(&req) {
        match state.authenticate(Some(header)).await {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable credentials on public route");
            }
        }
    }
    next.run(req).await
}

/// Middleware that checks the authenticated role against `allowed`
pub async fn authorize(
    State(allowed): State<&'static [UserRole]>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or(AuthError::AuthRequired)?;

    if let Err(e) = identity.authorize(allowed) {
        tracing::debug!(user_id = %identity.id, role = %identity.role, "Role not permitted");
        return Err(e);
    }

    Ok(next.run(req).await)
}

// ============================================================================
// Route helpers
// ============================================================================

/// Require a token whose role is in `allowed`
pub fn protect<S, R>(
    route: MethodRouter<S>,
    auth: &AuthMiddlewareState<R>,
    allowed: &'static [UserRole],
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
    R: UserRepository + Clone + Send + Sync + 'static,
{
    route
        .route_layer(middleware::from_fn_with_state(allowed, authorize))
        .route_layer(middleware::from_fn_with_state(auth.clone(), require_auth::<R>))
}

/// Require a token of any role
pub fn authenticated<S, R>(route: MethodRouter<S>, auth: &AuthMiddlewareState<R>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
    R: UserRepository + Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(auth.clone(), require_auth::<R>))
}

/// Attach an identity when one is offered
pub fn personalised<S, R>(route: MethodRouter<S>, auth: &AuthMiddlewareState<R>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
    R: UserRepository + Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(auth.clone(), optional_auth::<R>))
}

// ============================================================================
// Extractors
// ============================================================================

/// Identity of an authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::AuthRequired)
    }
}

/// Identity of the caller, if any
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Identity>().cloned()))
    }
}
