//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use kernel::validation::ValidationErrors;
use platform::password::PasswordHashError;
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    // ------------------------------------------------------------------------
    // Access control
    // ------------------------------------------------------------------------
    /// No bearer token, or no resolved identity
    #[error("Authentication required. Please login.")]
    AuthRequired,

    /// Signature or structure check failed
    #[error("Invalid token. Please login again.")]
    TokenInvalid,

    /// Token `exp` at or before now
    #[error("Token expired. Please login again.")]
    TokenExpired,

    /// Token subject no longer exists
    #[error("User associated with this token no longer exists.")]
    UserGone,

    /// Role not in the route's allow-list
    #[error("You do not have permission to access this resource.")]
    Forbidden,

    // ------------------------------------------------------------------------
    // Credentials
    // ------------------------------------------------------------------------
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    #[error("Refresh token is required")]
    RefreshTokenRequired,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    /// Refresh token verified but its subject is gone
    #[error("Invalid refresh token")]
    RefreshSubjectGone,

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------
    #[error("User with this email already exists")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid role")]
    InvalidRole,

    /// Demoting a store owner would leave their store with a non-owner
    #[error("User owns a store and must remain a store owner")]
    OwnerHasStore,

    /// The `roles` table is missing a built-in role
    #[error("Role configuration error")]
    RoleConfiguration,

    #[error("Validation Error")]
    Validation(ValidationErrors),

    // ------------------------------------------------------------------------
    // Infrastructure
    // ------------------------------------------------------------------------
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    Password(#[from] PasswordHashError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::AuthRequired
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::UserGone
            | AuthError::InvalidCredentials
            | AuthError::CurrentPasswordIncorrect
            | AuthError::InvalidRefreshToken
            | AuthError::RefreshSubjectGone => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::RefreshTokenRequired
            | AuthError::EmailTaken
            | AuthError::InvalidRole
            | AuthError::OwnerHasStore
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Database(e) => classify_sqlx(e).kind(),
            AuthError::RoleConfiguration | AuthError::Password(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Password(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::RoleConfiguration => {
                tracing::error!("Built-in role missing from roles table");
            }
            AuthError::InvalidCredentials | AuthError::CurrentPasswordIncorrect => {
                tracing::warn!("Invalid credentials presented");
            }
            AuthError::InvalidRefreshToken | AuthError::TokenInvalid => {
                tracing::warn!(error = %self, "Token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => AppError::validation(errors),
            AuthError::Database(e) => AppError::from(e),
            AuthError::Password(e) => AppError::internal("Server Error").with_source(e),
            other @ AuthError::Internal(_) => AppError::internal("Server Error").with_source(other),
            other =>AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        AuthError::Validation(errors)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AuthError::TokenInvalid,
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}
