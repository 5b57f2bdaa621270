//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::bad_request("Invalid integer format").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// Message returned for data exceptions and integrity constraint violations
pub const DATABASE_ERROR_MESSAGE: &str = "Database Error";

/// Classify a driver error without taking ownership of it
///
/// The returned error carries no source; [`From<sqlx::Error>`] attaches it.
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> AppError {
    match err {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            AppError::service_unavailable("Database connection pool exhausted")
        }
        sqlx::Error::Database(db_err) => {
            // PostgreSQL SQLSTATE
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();

            // Class 22 (data exception) and class 23 (integrity constraint violation)
            if code.starts_with("22") || code.starts_with("23") {
                let detail = db_err
                    .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                    .and_then(|pg| pg.detail())
                    .map(str::to_owned)
                    .unwrap_or_else(|| db_err.message().to_owned());
                return AppError::bad_request(DATABASE_ERROR_MESSAGE).with_detail(detail);
            }

            // Class 53 (insufficient resources) and class 57 (operator intervention)
            if code.starts_with("53") || code.starts_with("57") {
                AppError::service_unavailable("Database unavailable")
            } else {
                AppError::internal("Server Error")
            }
        }
        sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error"),
        _ => AppError::internal("Server Error"),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        classify_sqlx(&err).with_source(err)
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // 開発ビルドでのみ 5xx の元エラーを返す
        let body = self.to_body(cfg!(debug_assertions));

        (status, Json(body)).into_response()
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}
