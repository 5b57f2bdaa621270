//! HTTP Handlers

use axum::extract::State;
use std::sync::Arc;

use kernel::extract::{ApiJson, ApiPath, ApiQuery};
use kernel::id::UserId;
use kernel::pagination::PageQuery;
use kernel::response::ApiResponse;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordUseCase, LoginUseCase, ManageUsersUseCase, RefreshTokenUseCase, RegisterUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, ChangePasswordRequest, CreateUserRequest, LoginRequest, RefreshTokenRequest,
    RegisterRequest, TokenResponse, UpdateUserRequest, UserDetailResponse, UserListItem,
    UserListQuery, UserResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> AuthResult<ApiResponse<AuthResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate()?;

    let output = RegisterUseCase::new(state.repo.clone(), state.config.clone())
        .execute(input)
        .await?;

    Ok(ApiResponse::created(AuthResponse {
        user: output.user.into(),
        token: output.tokens.token,
        refresh_token: output.tokens.refresh_token,
    })
    .with_message("User registered successfully"))
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AuthResult<ApiResponse<AuthResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate()?;

    let output = LoginUseCase::new(state.repo.clone(), state.config.clone())
        .execute(input)
        .await?;

    Ok(ApiResponse::ok(AuthResponse {
        user: output.user.into(),
        token: output.tokens.token,
        refresh_token: output.tokens.refresh_token,
    })
    .with_message("Login successful"))
}

/// POST /api/auth/refresh-token
pub async fn refresh_token<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> AuthResult<ApiResponse<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let pair = RefreshTokenUseCase::new(state.repo.clone(), state.config.clone())
        .execute(req.refresh_token.as_deref())
        .await?;

    Ok(ApiResponse::ok(pair.into()))
}

// ============================================================================
// Authenticated self-service
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(identity): CurrentUser,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = state
        .repo
        .find_by_id(identity.id)
        .await?
        .ok_or(AuthError::UserGone)?;

    Ok(ApiResponse::ok(user.into()))
}

/// PUT /api/auth/password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(identity): CurrentUser,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> AuthResult<ApiResponse<()>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate(&identity)?;

    ChangePasswordUseCase::new(state.repo.clone(), state.config.clone())
        .execute(input)
        .await?;

    Ok(ApiResponse::message("Password updated successfully"))
}

/// POST /api/auth/logout
///
/// トークンはステートレスなので、サーバー側で失効させるものはない
pub async fn logout(CurrentUser(identity): CurrentUser) -> ApiResponse<()> {
    tracing::info!(user_id = %identity.id, "User logged out");
    ApiResponse::message("Logout successful")
}

// ============================================================================
// Admin user management
// ============================================================================

/// GET /api/users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    ApiQuery(filter): ApiQuery<UserListQuery>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> AuthResult<ApiResponse<Vec<UserListItem>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let page = page.parse()?;
    let filter = filter.validate()?;

    let users = ManageUsersUseCase::new(state.repo.clone(), state.config.clone())
        .list(filter, page)
        .await?;

    Ok(ApiResponse::page(users.map(UserListItem::from)))
}

/// GET /api/users/{id}
pub async fn get_user<R>(
    State(state): State<AuthAppState<R>>,
    ApiPath(id): ApiPath<UserId>,
) -> AuthResult<ApiResponse<UserDetailResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let detail = ManageUsersUseCase::new(state.repo.clone(), state.config.clone())
        .get(id)
        .await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// POST /api/users
pub async fn create_user<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate()?;

    let user = ManageUsersUseCase::new(state.repo.clone(), state.config.clone())
        .create(input)
        .await?;

    Ok(ApiResponse::created(user.into()).with_message("User created successfully"))
}

/// PUT /api/users/{id}
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> AuthResult<ApiResponse<UserDetailResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate()?;

    let detail = ManageUsersUseCase::new(state.repo.clone(), state.config.clone())
        .update(id, input)
        .await?;

    Ok(ApiResponse::ok(detail.into()).with_message("User updated successfully"))
}

/// DELETE /api/users/{id}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    ApiPath(id): ApiPath<UserId>,
) -> AuthResult<ApiResponse<()>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    ManageUsersUseCase::new(state.repo.clone(), state.config.clone())
        .delete(id)
        .await?;

    Ok(ApiResponse::message("User deleted successfully"))
}
