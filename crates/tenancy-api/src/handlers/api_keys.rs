// ============================================================================
// Tenancy API - API Key Handlers
// File: crates/tenancy-api/src/handlers/api_keys.rs
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use tenancy_shared::types::Pagination;

use super::{ok, ApiResult};
use crate::dto::{ApiKeyDto, CreateApiKeyRequest, UpdateApiKeyRequest};
use crate::error::ApiError;
use crate::extract::Authenticated;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<ApiKeyDto>> {
    let keys = state.services.api_keys.list(&ctx, &page).await?;
    ok(keys.into_iter().map(ApiKeyDto::masked).collect())
}

pub async fn get(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiKeyDto> {
    ok(ApiKeyDto::masked(state.services.api_keys.get(&ctx, id).await?))
}

/// The only response that carries the full secret.
pub async fn create(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Json(payload): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ApiKeyDto>>), ApiError> {
    payload.validate()?;
    let key = state.services.api_keys.create(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(ApiKeyDto::revealed(key)))))
}

pub async fn update(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApiKeyRequest>,
) -> ApiResult<ApiKeyDto> {
    let key = state.services.api_keys.update(&ctx, id, payload.into()).await?;
    ok(ApiKeyDto::masked(key))
}

pub async fn delete(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.api_keys.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn activate(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiKeyDto> {
    ok(ApiKeyDto::masked(state.services.api_keys.activate(&ctx, id).await?))
}

pub async fn deactivate(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiKeyDto> {
    ok(ApiKeyDto::masked(state.services.api_keys.deactivate(&ctx, id).await?))
}
