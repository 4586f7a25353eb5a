// ============================================================================
// Tenancy Core - Tenant Service
// File: crates/tenancy-core/src/services/tenant_service.rs
// Description: Tenant management, restricted to the master context
// ============================================================================

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use tenancy_shared::types::Pagination;

use crate::context::RequestContext;
use crate::domain::{Address, Subscription, Tenant};
use crate::error::DomainError;
use crate::repositories::{StoreBackend, TenantStore};

#[derive(Debug, Clone, Default)]
pub struct NewTenant {
    pub id: Option<Uuid>,
    pub tenant_name: String,
    pub company_name: String,
    pub admin_email: String,
    pub address: Option<Address>,
    pub subscription_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct TenantChanges {
    pub tenant_name: Option<String>,
    pub company_name: Option<String>,
    pub admin_email: Option<String>,
    pub address: Option<Address>,
    /// `Some(None)` clears the subscription.
    pub subscription_id: Option<Option<Uuid>>,
}

/// Rejects non-master callers. Tenant rows carry no row filter, so this check is
/// the only thing keeping one tenant out of another's record.
pub fn require_master(ctx: &RequestContext, operation: &str) -> Result<(), DomainError> {
    if ctx.is_master() {
        return Ok(());
    }
    warn!("Tenant {} denied master-only operation {}", ctx.tenant_id(), operation);
    Err(DomainError::Forbidden(format!("{} requires the master tenant", operation)))
}

#[derive(Clone)]
pub struct TenantService {
    backend: Arc<dyn StoreBackend>,
}

impl TenantService {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    fn store(&self, ctx: &RequestContext) -> TenantStore {
        TenantStore::new(self.backend.clone(), ctx.tenant())
    }

    pub async fn list(&self, ctx: &RequestContext, page: &Pagination) -> Result<Vec<Tenant>, DomainError> {
        require_master(ctx, "list tenants")?;
        let tenants = self.store(ctx).unowned::<Tenant>().list().await?;
        Ok(page.apply(tenants))
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Tenant, DomainError> {
        require_master(ctx, "get tenant")?;
        self.store(ctx).unowned::<Tenant>().require(id).await
    }

    pub async fn create(&self, ctx: &RequestContext, input: NewTenant) -> Result<Tenant, DomainError> {
        require_master(ctx, "create tenant")?;
        let store = self.store(ctx);

        let mut tenant = Tenant::new(input.tenant_name, input.company_name, input.admin_email)?;
        if let Some(id) = input.id {
            if id.is_nil() {
                return Err(DomainError::ValidationError("tenant id must not be nil".into()));
            }
            tenant = tenant.with_id(id);
        }
        if let Some(address) = input.address {
            tenant.set_address(address);
        }
        if let Some(subscription_id) = input.subscription_id {
            ensure_subscription_exists(&store, subscription_id).await?;
            tenant.subscription_id = Some(subscription_id);
        }

        if store.unowned::<Tenant>().get(tenant.id).await?.is_some() {
            return Err(DomainError::Conflict(format!("tenant {}", tenant.id)));
        }

        let mut uow = store.begin();
        uow.insert_unowned(tenant.clone());
        uow.commit().await?;

        info!("Tenant created: {} ({})", tenant.tenant_name, tenant.id);
        Ok(tenant)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        changes: TenantChanges,
    ) -> Result<Tenant, DomainError> {
        require_master(ctx, "update tenant")?;
        let store = self.store(ctx);
        let mut tenant = store.unowned::<Tenant>().require(id).await?;

        if let Some(name) = changes.tenant_name {
            tenant.tenant_name = name.trim().to_string();
        }
        if let Some(company) = changes.company_name {
            tenant.company_name = company.trim().to_string();
        }
        if let Some(email) = changes.admin_email {
            tenant.admin_email = email.trim().to_string();
        }
        if let Some(address) = changes.address {
            tenant.set_address(address);
        }
        if let Some(subscription_id) = changes.subscription_id {
            if let Some(sid) = subscription_id {
                ensure_subscription_exists(&store, sid).await?;
            }
            tenant.subscription_id = subscription_id;
        }
        tenant.validate()?;

        let mut uow = store.begin();
        uow.update_unowned(tenant.clone());
        uow.commit().await?;

        info!("Tenant updated: {}", tenant.id);
        Ok(tenant)
    }

    /// Deleting a tenant that does not exist is a no-op.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), DomainError> {
        require_master(ctx, "delete tenant")?;
        let store = self.store(ctx);

        if store.unowned::<Tenant>().get(id).await?.is_none() {
            return Ok(());
        }

        let mut uow = store.begin();
        uow.delete_unowned::<Tenant>(id);
        uow.commit().await?;

        info!("Tenant deleted: {}", id);
        Ok(())
    }
}

pub(crate) async fn ensure_subscription_exists(store: &TenantStore, id: Uuid) -> Result<(), DomainError> {
    if store.unowned::<Subscription>().get(id).await?.is_none() {
        return Err(DomainError::ValidationError(format!("unknown subscription {}", id)));
    }
    Ok(())
}
