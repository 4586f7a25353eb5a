//! Tenant onboarding

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::dto::{RegistrationRequest, RegistrationResponse};
use crate::error::ApiError;
use crate::extract::Authenticated;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/registrations
pub async fn register(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Json(payload): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegistrationResponse>>), ApiError> {
    payload.validate()?;
    let outcome = state.services.registrations.register(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(outcome.into()))))
}
