// ============================================================================
// Tenancy API - Tenant Handlers
// File: crates/tenancy-api/src/handlers/tenants.rs
// ============================================================================
//! Tenant management (master only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use tenancy_core::domain::Tenant;
use tenancy_shared::types::Pagination;

use super::{ok, ApiResult};
use crate::dto::{CreateTenantRequest, UpdateTenantRequest};
use crate::error::ApiError;
use crate::extract::Authenticated;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/tenants
pub async fn list(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<Tenant>> {
    ok(state.services.tenants.list(&ctx, &page).await?)
}

/// GET /api/v1/tenants/{id}
pub async fn get(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<Tenant> {
    ok(state.services.tenants.get(&ctx, id).await?)
}

/// POST /api/v1/tenants
pub async fn create(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Json(payload): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Tenant>>), ApiError> {
    payload.validate()?;
    let tenant = state.services.tenants.create(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tenant))))
}

/// PUT /api/v1/tenants/{id}
pub async fn update(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTenantRequest>,
) -> ApiResult<Tenant> {
    ok(state.services.tenants.update(&ctx, id, payload.into()).await?)
}

/// DELETE /api/v1/tenants/{id}
pub async fn delete(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.tenants.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
