//! HTTP handlers

pub mod health;
pub mod tenants;
pub mod subscriptions;
pub mod roles;
pub mod users;
pub mod groups;
pub mod api_keys;
pub mod features;
pub mod registrations;

use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::response::ApiResponse;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub(crate) fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
