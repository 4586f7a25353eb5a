// ============================================================================
// Tenancy API - Role Handlers
// File: crates/tenancy-api/src/handlers/roles.rs
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use tenancy_core::domain::Role;
use tenancy_shared::types::Pagination;

use super::{ok, ApiResult};
use crate::dto::{CreateRoleRequest, UpdateRoleRequest};
use crate::error::ApiError;
use crate::extract::Authenticated;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<Role>> {
    ok(state.services.roles.list(&ctx, &page).await?)
}

pub async fn get(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<Role> {
    ok(state.services.roles.get(&ctx, id).await?)
}

pub async fn create(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Json(payload): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Role>>), ApiError> {
    payload.validate()?;
    let role = state.services.roles.create(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(role))))
}

pub async fn update(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Role> {
    ok(state.services.roles.update(&ctx, id, payload.into()).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.roles.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/roles/{id}/users/{user_id}
pub async fn add_user(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Role> {
    ok(state.services.roles.add_user(&ctx, id, user_id).await?)
}

/// DELETE /api/v1/roles/{id}/users/{user_id}
pub async fn remove_user(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Role> {
    ok(state.services.roles.remove_user(&ctx, id, user_id).await?)
}

/// POST /api/v1/roles/{id}/features/{feature}
pub async fn add_feature(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, feature)): Path<(Uuid, String)>,
) -> ApiResult<Role> {
    ok(state.services.roles.add_feature(&ctx, id, &feature).await?)
}

/// DELETE /api/v1/roles/{id}/features/{feature}
pub async fn remove_feature(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, feature)): Path<(Uuid, String)>,
) -> ApiResult<Role> {
    ok(state.services.roles.remove_feature(&ctx, id, &feature).await?)
}
