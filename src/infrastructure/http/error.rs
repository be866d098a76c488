//! HTTP Error Handling
//!
//! 错误响应统一为 `{"detail": "..."}`，并使用真实的 HTTP 状态码

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 400 - 违反公开约束
    BadRequest(String),
    /// 422 - 字段无法解析或取值不受支持
    Unprocessable(String),
    /// 502 - 托管后端或 CDN 失败
    BadGateway(String),
    /// 500 - 其他失败
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest(msg) | ApiError::Unprocessable(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Rejected request");
            }
            ApiError::BadGateway(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "Upstream failure");
            }
            ApiError::Internal(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "Internal server error");
            }
        }

        let body = ErrorResponse {
            detail: self.detail().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::UnsupportedValue(msg) => ApiError::Unprocessable(msg),
            e if e.is_upstream() => ApiError::BadGateway(e.to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}
