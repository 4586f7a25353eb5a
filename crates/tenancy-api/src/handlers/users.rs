// ============================================================================
// Tenancy API - User Handlers
// File: crates/tenancy-api/src/handlers/users.rs
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use tenancy_core::domain::User;
use tenancy_shared::types::Pagination;

use super::{ok, ApiResult};
use crate::dto::{CreateUserRequest, LoginSyncRequest, UpdateUserRequest};
use crate::error::ApiError;
use crate::extract::Authenticated;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<User>> {
    ok(state.services.users.list(&ctx, &page).await?)
}

pub async fn get(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<User> {
    ok(state.services.users.get(&ctx, id).await?)
}

/// GET /api/v1/users/by-email/{email}
pub async fn get_by_email(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(email): Path<String>,
) -> ApiResult<User> {
    ok(state.services.users.get_by_email(&ctx, &email).await?)
}

pub async fn delete_by_email(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(email): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.services.users.delete_by_email(&ctx, &email).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    payload.validate()?;
    let user = state.services.users.create(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn update(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    ok(state.services.users.update(&ctx, id, payload.into()).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.users.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/login
pub async fn sync_login(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Json(payload): Json<LoginSyncRequest>,
) -> ApiResult<User> {
    payload.validate()?;
    let user = state
        .services
        .users
        .upsert_after_login(
            &ctx,
            &payload.email,
            &payload.identity_provider_id,
            &payload.first_name,
            &payload.last_name,
        )
        .await?;
    ok(user)
}

pub async fn add_feature(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, feature)): Path<(Uuid, String)>,
) -> ApiResult<User> {
    ok(state.services.users.add_feature(&ctx, id, &feature).await?)
}

pub async fn remove_feature(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, feature)): Path<(Uuid, String)>,
) -> ApiResult<User> {
    ok(state.services.users.remove_feature(&ctx, id, &feature).await?)
}

pub async fn assign_role(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, role_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<User> {
    ok(state.services.users.assign_role(&ctx, id, role_id).await?)
}

pub async fn unassign_role(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path((id, role_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<User> {
    ok(state.services.users.unassign_role(&ctx, id, role_id).await?)
}
