//! User group handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use tenancy_core::domain::UserGroup;
use tenancy_shared::types::Pagination;

use super::{ok, ApiResult};
use crate::dto::{CreateGroupRequest, UpdateGroupRequest};
use crate::error::ApiError;
use crate::extract::Authenticated;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<UserGroup>> {
    ok(state.services.groups.list(&ctx, &page).await?)
}

pub async fn get(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<UserGroup> {
    ok(state.services.groups.get(&ctx, id).await?)
}

pub async fn create(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserGroup>>), ApiError> {
    payload.validate()?;
    let group = state.services.groups.create(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(group))))
}

pub async fn update(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGroupRequest>,
) -> ApiResult<UserGroup> {
    ok(state.services.groups.update(&ctx, id, payload.into()).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.groups.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_user(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<UserGroup> {
    ok(state.services.groups.add_user(&ctx, id, user_id).await?)
}

pub async fn remove_user(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<UserGroup> {
    ok(state.services.groups.remove_user(&ctx, id, user_id).await?)
}

pub async fn add_feature(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, feature)): Path<(Uuid, String)>,
) -> ApiResult<UserGroup> {
    ok(state.services.groups.add_feature(&ctx, id, &feature).await?)
}

pub async fn remove_feature(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, feature)): Path<(Uuid, String)>,
) -> ApiResult<UserGroup> {
    ok(state.services.groups.remove_feature(&ctx, id, &feature).await?)
}
