//! Feature entitlement queries for the calling context

use axum::extract::{Path, State};

use super::{ok, ApiResult};
use crate::dto::FeatureDecision;
use crate::extract::Authenticated;
use crate::state::AppState;

/// GET /api/v1/features
pub async fn subscribed(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
) -> ApiResult<Vec<String>> {
    ok(state.services.features.subscribed_features(&ctx).await?)
}

/// GET /api/v1/features/{name}
pub async fn check(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(name): Path<String>,
) -> ApiResult<FeatureDecision> {
    let enabled = state.services.features.has_feature(&ctx, &name).await?;
    ok(FeatureDecision { feature: name, enabled })
}
