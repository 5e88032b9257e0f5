use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::YieldError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// The request was well formed but the yield could not be computed.
    Unprocessable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, axum::Json(json!({ "error": msg }))).into_response()
    }
}

impl From<YieldError> for ApiError {
    fn from(err: YieldError) -> Self {
        match err {
            YieldError::Storage(e) => ApiError::Internal(format!("storage: {e}")),
            other => ApiError::Unprocessable(other.to_string()),
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(format!("storage: {err}"))
    }
}

impl ApiError {
    pub fn yield_not_found() -> Self {
        ApiError::NotFound("Yield not found".into())
    }
}
