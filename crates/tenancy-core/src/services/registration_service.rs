// ============================================================================
// Tenancy Core - Registration Service
// File: crates/tenancy-core/src/services/registration_service.rs
// Description: Onboards a tenant with its admin role, admin user and first key
// ============================================================================

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use tenancy_shared::constants::TENANT_ADMIN_ROLE;
use tenancy_shared::utils::mask_email;

use crate::context::RequestContext;
use crate::domain::{Address, ApiKey, Role, Tenant, User};
use crate::error::DomainError;
use crate::repositories::{StoreBackend, TenantStore};
use crate::services::tenant_service::{ensure_subscription_exists, require_master};

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub tenant_name: String,
    pub company_name: String,
    pub admin_email: String,
    pub admin_first_name: String,
    pub admin_last_name: String,
    pub admin_identity_provider_id: String,
    pub address: Option<Address>,
    pub subscription_id: Option<Uuid>,
    pub key_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub tenant_id: Uuid,
    pub admin_user_id: Uuid,
    pub admin_role_id: Uuid,
    /// Secret of the first key. Returned once and never again.
    pub api_key: String,
}

#[derive(Clone)]
pub struct RegistrationService {
    backend: Arc<dyn StoreBackend>,
}

impl RegistrationService {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    pub async fn register(&self, ctx: &RequestContext, input: Registration) -> Result<RegistrationOutcome, DomainError> {
        require_master(ctx, "register tenant")?;
        let store = TenantStore::new(self.backend.clone(), ctx.tenant());

        let mut tenant = Tenant::new(input.tenant_name, input.company_name, input.admin_email.clone())?;
        if let Some(address) = input.address {
            tenant.set_address(address);
        }
        if let Some(subscription_id) = input.subscription_id {
            ensure_subscription_exists(&store, subscription_id).await?;
            tenant.subscription_id = Some(subscription_id);
        }

        let mut role = Role::new(TENANT_ADMIN_ROLE.to_string(), "Tenant administrator".to_string())?;
        let mut admin = User::new(
            input.admin_email,
            input.admin_first_name,
            input.admin_last_name,
            input.admin_identity_provider_id,
        )?;
        let label = input.key_label.unwrap_or_else(|| "default".to_string());
        let mut key = ApiKey::generate(label, None)?;

        role.tenant_id = tenant.id;
        admin.tenant_id = tenant.id;
        key.tenant_id = tenant.id;
        role.add_user(admin.id);
        admin.add_role(role.id);

        let outcome = RegistrationOutcome {
            tenant_id: tenant.id,
            admin_user_id: admin.id,
            admin_role_id: role.id,
            api_key: key.key.clone(),
        };

        let mut uow = store.begin();
        uow.insert_unowned(tenant)
            .insert(role)
            .insert(admin.clone())
            .insert(key);
        uow.commit().await?;

        info!(
            "Tenant {} registered with admin {}",
            outcome.tenant_id,
            mask_email(&admin.email)
        );
        Ok(outcome)
    }
}
