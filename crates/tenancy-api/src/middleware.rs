// ============================================================================
// Tenancy API - Tenant Context Middleware
// File: crates/tenancy-api/src/middleware.rs
// ============================================================================
//! Resolves the caller's tenant context before any handler runs.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use tenancy_core::services::PresentedCredentials;
use tenancy_shared::constants::{HEADER_API_KEY, HEADER_IDENTITY_PROVIDER_ID, HEADER_TENANT_ID};

use crate::error::ApiError;
use crate::state::AppState;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn presented_credentials(headers: &HeaderMap) -> PresentedCredentials {
    PresentedCredentials {
        api_key: header(headers, HEADER_API_KEY),
        tenant_id: header(headers, HEADER_TENANT_ID),
        identity_provider_id: header(headers, HEADER_IDENTITY_PROVIDER_ID),
    }
}

/// Stores the resolved [`RequestContext`](tenancy_core::RequestContext) in the request
/// extensions; an invalid credential ends the request with 401.
pub async fn require_tenant_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = presented_credentials(request.headers());
    let ctx = state.services.resolver.resolve(&presented).await?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
