//! REST API over the item store.
//!
//! Errors are rendered as `{"error": "..."}` bodies. Storage failures are
//! logged in full and reported to callers with a generic message.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use routes::{build_router, cors_layer};
pub use state::AppState;

use crate::core::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub const NAME_REQUIRED_MESSAGE: &str = "Name is required";
pub const ITEM_NOT_FOUND_MESSAGE: &str = "Item not found";
pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON body";
pub const STORAGE_ERROR_MESSAGE: &str = "Storage error";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::not_found(ITEM_NOT_FOUND_MESSAGE),
            other => Self::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Storage(err) => {
                error!(error = %err, "item store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    STORAGE_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_item_not_found() {
        let mapped = ApiError::from(StoreError::NotFound("abc".to_string()));
        match mapped {
            ApiError::NotFound(message) => assert_eq!(message, ITEM_NOT_FOUND_MESSAGE),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn storage_failures_hide_details() {
        let response = ApiError::from(StoreError::Io("disk full".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
