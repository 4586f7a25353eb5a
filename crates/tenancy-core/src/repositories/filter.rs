//! Row visibility filter

use tracing::debug;
use uuid::Uuid;

use crate::context::TenantContext;

/// Named internal operations allowed to read past the visibility filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bypass {
    /// Looking up a dynamic key before any tenant context exists.
    ApiKeyAuthentication,
    /// One-time seeding of the master tenant and its administrator.
    Bootstrap,
}

impl Bypass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bypass::ApiKeyAuthentication => "api_key_authentication",
            Bypass::Bootstrap => "bootstrap",
        }
    }
}

/// Visibility predicate for one table, handed to the backend with every select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFilter {
    /// `is_master OR row.tenant_id = tenant_id`
    Owned { tenant_id: Uuid, is_master: bool },
    /// Types without an owner (tenants, the subscription catalogue).
    Exempt,
    Bypassed(Bypass),
}

impl RowFilter {
    pub fn for_context(ctx: TenantContext) -> Self {
        RowFilter::Owned {
            tenant_id: ctx.tenant_id(),
            is_master: ctx.is_master(),
        }
    }

    pub fn bypassed(reason: Bypass) -> Self {
        debug!("Row filter bypassed for {}", reason.as_str());
        RowFilter::Bypassed(reason)
    }

    pub fn admits(&self, row_tenant: Option<Uuid>) -> bool {
        match self {
            RowFilter::Owned { tenant_id, is_master } => *is_master || row_tenant == Some(*tenant_id),
            RowFilter::Exempt | RowFilter::Bypassed(_) => true,
        }
    }
}
