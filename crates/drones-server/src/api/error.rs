//! Mapping of presenter and store failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use drones_core::PresentError;
use serde_json::json;

use crate::state::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Present(#[from] PresentError),
    /// The request never reached a presenter (bad body, bad query).
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Present(err) => ApiError::Present(err),
            StoreError::Storage(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Present(PresentError::Validation(errors)) => {
                tracing::debug!("Rejected input: {}", errors);
                (StatusCode::BAD_REQUEST, Json(json!(errors))).into_response()
            }
            ApiError::Present(PresentError::NotFound { kind, key }) => {
                tracing::debug!("{} {} not found", kind, key);
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            }
            ApiError::Rejected { status, detail } => {
                tracing::debug!("Rejected request: {}", detail);
                (status, Json(json!({ "detail": detail }))).into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}
