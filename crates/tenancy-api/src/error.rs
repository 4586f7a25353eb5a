//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use tenancy_core::error::{DomainError, UNAUTHENTICATED_MESSAGE};

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        ApiError::Domain(DomainError::Unauthenticated)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg)
            }
            ApiError::Domain(err) => match err {
                DomainError::Unauthenticated => (
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized",
                    UNAUTHENTICATED_MESSAGE.to_string(),
                ),
                DomainError::Forbidden(msg) => (StatusCode::FORBIDDEN, "Forbidden", msg),
                err @ DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "NotFound", err.to_string()),
                err @ DomainError::FeatureNotSubscribed(_) => {
                    tracing::warn!("{}", err);
                    (StatusCode::CONFLICT, "FeatureNotSubscribed", err.to_string())
                }
                err @ DomainError::Conflict(_) => (StatusCode::CONFLICT, "Conflict", err.to_string()),
                DomainError::ValidationError(msg) => (StatusCode::BAD_REQUEST, "ValidationError", msg),
                DomainError::DatabaseError(msg) => {
                    tracing::error!("Database error: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DatabaseError",
                        "The request could not be completed".to_string(),
                    )
                }
                DomainError::InternalError(msg) => {
                    tracing::error!("Internal error: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "InternalError",
                        "The request could not be completed".to_string(),
                    )
                }
            },
        };

        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}
