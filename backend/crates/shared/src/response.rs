//! Success envelope
//!
//! Every successful response has the shape
//! `{success: true, message?, data?, pagination?}`.

use std::borrow::Cow;

use serde::Serialize;

use crate::pagination::{Page, Pagination};

/// 成功レスポンス
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    status: u16,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<Cow<'static, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// 200 with data
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    /// 201 with data
    pub fn created(data: T) -> Self {
        Self {
            status: 201,
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// 200 with one page of rows
    pub fn page(page: Page<T>) -> Self {
        Self {
            pagination: Some(page.pagination),
            ..Self::ok(page.items)
        }
    }
}

impl ApiResponse<()> {
    /// 200 with a message and no data
    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status: 200,
            success: true,
            message: Some(message.into()),
            data: None,
            pagination: None,
        }
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
