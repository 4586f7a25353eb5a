//! Request-scoped tenant context.
//!
//! A [`TenantContext`] is produced once per request by the context resolver and then
//! passed by value down every call chain. There is no process-wide "current tenant".

use serde::Serialize;
use uuid::Uuid;

/// Who the request acts as. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TenantContext {
    tenant_id: Uuid,
    is_master: bool,
}

impl TenantContext {
    /// Master context acting on behalf of `tenant_id`.
    pub const fn master(tenant_id: Uuid) -> Self {
        Self { tenant_id, is_master: true }
    }

    /// Ordinary tenant context, restricted to `tenant_id`.
    pub const fn tenant(tenant_id: Uuid) -> Self {
        Self { tenant_id, is_master: false }
    }

    pub const fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    pub const fn is_master(&self) -> bool {
        self.is_master
    }
}

/// Everything the engine knows about the caller of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    tenant: TenantContext,
    /// Identity-provider linkage id of the acting user, when forwarded.
    subject: Option<String>,
    /// Label of the dynamic key used, `None` for the master credential.
    key_label: Option<String>,
}

impl RequestContext {
    pub fn new(tenant: TenantContext, key_label: Option<String>) -> Self {
        Self { tenant, subject: None, key_label }
    }

    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn tenant(&self) -> TenantContext {
        self.tenant
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant.tenant_id()
    }

    pub fn is_master(&self) -> bool {
        self.tenant.is_master()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn key_label(&self) -> Option<&str> {
        self.key_label.as_deref()
    }
}
