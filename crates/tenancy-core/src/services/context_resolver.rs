//! Tenant context resolver
//!
//! Turns the credentials of one request into its [`RequestContext`]. The context is
//! built once, before any handler runs, and never re-derived.

use std::sync::Arc;

use tracing::debug;

use crate::context::{RequestContext, TenantContext};
use crate::error::DomainError;
use crate::services::api_key_validator::{ApiKeyValidator, Credential};

/// Raw credential headers as presented by the caller.
#[derive(Debug, Clone, Default)]
pub struct PresentedCredentials {
    pub api_key: Option<String>,
    pub tenant_id: Option<String>,
    pub identity_provider_id: Option<String>,
}

#[derive(Clone)]
pub struct ContextResolver {
    validator: Arc<ApiKeyValidator>,
}

impl ContextResolver {
    pub fn new(validator: Arc<ApiKeyValidator>) -> Self {
        Self { validator }
    }

    pub async fn resolve(&self, presented: &PresentedCredentials) -> Result<RequestContext, DomainError> {
        let credential = self
            .validator
            .validate(presented.api_key.as_deref(), presented.tenant_id.as_deref())
            .await?;

        let ctx = match credential {
            Credential::Master { tenant_id } => RequestContext::new(TenantContext::master(tenant_id), None),
            Credential::Tenant { tenant_id, key_label } => {
                RequestContext::new(TenantContext::tenant(tenant_id), Some(key_label))
            }
            Credential::Invalid => return Err(DomainError::Unauthenticated),
        };

        debug!(
            "Resolved context: tenant={} master={}",
            ctx.tenant_id(),
            ctx.is_master()
        );
        Ok(ctx.with_subject(presented.identity_provider_id.clone()))
    }
}
