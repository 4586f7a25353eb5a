//! Subscription catalogue handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use tenancy_core::domain::Subscription;
use tenancy_shared::types::Pagination;

use super::{ok, ApiResult};
use crate::dto::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use crate::error::ApiError;
use crate::extract::Authenticated;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<Subscription>> {
    ok(state.services.subscriptions.list(&ctx, &page).await?)
}

pub async fn get(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<Subscription> {
    ok(state.services.subscriptions.get(&ctx, id).await?)
}

pub async fn create(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Subscription>>), ApiError> {
    payload.validate()?;
    let subscription = state
        .services
        .subscriptions
        .create(&ctx, payload.name, payload.description, payload.features)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(subscription))))
}

pub async fn update(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> ApiResult<Subscription> {
    ok(state.services.subscriptions.update(&ctx, id, payload.into()).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.subscriptions.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
