//! Request context extractor

use axum::{extract::FromRequestParts, http::request::Parts};

use tenancy_core::context::RequestContext;

use crate::error::ApiError;

/// The context resolved by [`require_tenant_context`](crate::middleware::require_tenant_context).
pub struct Authenticated(pub RequestContext);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(ApiError::unauthenticated)
    }
}
