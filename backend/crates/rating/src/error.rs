//! Rating Error Types
//!
//! Store, rating and dashboard failures, integrated with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use auth::AuthError;
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use kernel::validation::ValidationErrors;
use thiserror::Error;

/// Rating-specific result type alias
pub type RatingResult<T> = Result<T, RatingError>;

#[derive(Debug, Error)]
pub enum RatingError {
    // ------------------------------------------------------------------------
    // Not found
    // ------------------------------------------------------------------------
    #[error("Store not found")]
    StoreNotFound,

    #[error("Rating not found")]
    RatingNotFound,

    #[error("Owner not found")]
    OwnerNotFound,

    /// STORE_OWNER caller without a store
    #[error("You do not have a store assigned")]
    NoStoreAssigned,

    // ------------------------------------------------------------------------
    // Ownership
    // ------------------------------------------------------------------------
    #[error("User must have a STORE_OWNER role to be assigned as owner")]
    OwnerNotStoreOwner,

    /// Each owner has at most one store
    #[error("Owner already has a store assigned")]
    OwnerAlreadyAssigned,

    /// STORE_OWNER asking about a store they do not own
    #[error("You do not have permission to access this resource")]
    NotYourStore,

    #[error("Validation Error")]
    Validation(ValidationErrors),

    /// Failure while resolving users (owner lookups, counts)
    #[error(transparent)]
    Auth(#[from] AuthError),

    // ------------------------------------------------------------------------
    // Infrastructure
    // ------------------------------------------------------------------------
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RatingError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RatingError::StoreNotFound
            | RatingError::RatingNotFound
            | RatingError::OwnerNotFound
            | RatingError::NoStoreAssigned => ErrorKind::NotFound,
            RatingError::OwnerNotStoreOwner
            | RatingError::OwnerAlreadyAssigned
            | RatingError::Validation(_) => ErrorKind::BadRequest,
            RatingError::NotYourStore => ErrorKind::Forbidden,
            RatingError::Auth(e) => e.kind(),
            RatingError::Database(e) => classify_sqlx(e).kind(),
            RatingError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            RatingError::Database(e) => {
                tracing::error!(error = %e, "Rating database error");
            }
            RatingError::Internal(msg) => {
                tracing::error!(message = %msg, "Rating internal error");
            }
            RatingError::NotYourStore => {
                tracing::warn!("Store owner attempted cross-store access");
            }
            _ => {
                tracing::debug!(error = %self, "Rating error");
            }
        }
    }
}

impl From<RatingError> for AppError {
    fn from(err: RatingError) -> Self {
        match err {
            RatingError::Validation(errors) => AppError::validation(errors),
            RatingError::Auth(e) => AppError::from(e),
            RatingError::Database(e) => AppError::from(e),
            other @ RatingError::Internal(_) => AppError::internal("Server Error").with_source(other),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for RatingError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<ValidationErrors> for RatingError {
    fn from(errors: ValidationErrors) -> Self {
        RatingError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RatingError::StoreNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(RatingError::NoStoreAssigned.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(RatingError::OwnerNotStoreOwner.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RatingError::NotYourStore.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            RatingError::Auth(AuthError::UserNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_detail_is_not_the_message() {
        let app: AppError = RatingError::Internal("row vanished".into()).into();
        assert_eq!(app.message(), "Server Error");
    }
}
