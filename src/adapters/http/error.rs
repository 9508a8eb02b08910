//! Error payloads shared by all endpoints.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// `{error, message}` body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(error, "入力内容を確認してください")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("見つかりません", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("リクエストが競合しました", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new("外部サービスエラー", message)
    }

    pub fn internal() -> Self {
        Self::new("サーバーエラーが発生しました", "しばらくしてからもう一度お試しください")
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Maps a rejected JSON body to a 400.
pub fn json_rejection(rejection: JsonRejection) -> Response {
    tracing::debug!(reason = %rejection.body_text(), "rejected request body");
    let error = match rejection {
        JsonRejection::MissingJsonContentType(_) => "Content-Type must be application/json",
        _ => "Invalid JSON data",
    };
    ErrorResponse::bad_request(error).into_response_with(StatusCode::BAD_REQUEST)
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> Response {
    ErrorResponse::not_found("指定されたAPIは存在しません").into_response_with(StatusCode::NOT_FOUND)
}
