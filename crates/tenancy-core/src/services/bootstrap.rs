//! Bootstrap seeding
//!
//! Ensures the master tenant, its `TenantAdmin` role and the configured admin user exist
//! and reference each other. Safe to run on every start.

use std::sync::Arc;

use tracing::info;

use tenancy_shared::config::AuthSettings;
use tenancy_shared::constants::TENANT_ADMIN_ROLE;
use tenancy_shared::utils::mask_email;

use crate::context::TenantContext;
use crate::domain::{Role, Tenant, User};
use crate::error::DomainError;
use crate::repositories::{Bypass, Criterion, Privileged, Query, StoreBackend};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No admin email configured.
    Skipped,
    /// Everything was already in place.
    Unchanged,
    Seeded { changes: usize },
}

pub async fn seed(backend: Arc<dyn StoreBackend>, auth: &AuthSettings) -> Result<BootstrapOutcome, DomainError> {
    let email = match auth.admin_email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) => email.to_lowercase(),
        None => {
            info!("Bootstrap skipped: no admin email configured");
            return Ok(BootstrapOutcome::Skipped);
        }
    };
    let master_id = auth.master_tenant_id.ok_or_else(|| {
        DomainError::ValidationError("auth.master_tenant_id is required to seed the admin user".into())
    })?;

    let store = Privileged::new(backend, Bypass::Bootstrap);
    let mut uow = store.begin(TenantContext::master(master_id));

    if store.unowned::<Tenant>().get(master_id).await?.is_none() {
        let tenant = Tenant::new("master".into(), "Master Tenant".into(), email.clone())?.with_id(master_id);
        uow.insert_unowned(tenant);
    }

    let role_query = Query::all()
        .with(Criterion::TenantIs(master_id))
        .field_eq("title", TENANT_ADMIN_ROLE);
    let existing_role = store.owned::<Role>().first(&role_query).await?;

    let user_query = Query::all()
        .with(Criterion::TenantIs(master_id))
        .field_eq("email", email.clone());
    let existing_user = store.owned::<User>().first(&user_query).await?;

    let role_is_new = existing_role.is_none();
    let user_is_new = existing_user.is_none();

    let mut role = match existing_role {
        Some(role) => role,
        None => Role::new(TENANT_ADMIN_ROLE.into(), "Tenant administrator".into())?,
    };
    let mut user = match existing_user {
        Some(user) => user,
        None => User::new(email.clone(), "Admin".into(), String::new(), String::new())?,
    };
    role.tenant_id = master_id;
    user.tenant_id = master_id;

    let linked = role.user_ids.contains(&user.id) && user.role_ids.contains(&role.id);
    role.add_user(user.id);
    user.add_role(role.id);

    if role_is_new {
        uow.insert(role);
    } else if !linked {
        uow.update(role);
    }
    if user_is_new {
        uow.insert(user);
    } else if !linked {
        uow.update(user);
    }

    if uow.is_empty() {
        return Ok(BootstrapOutcome::Unchanged);
    }

    let changes = uow.len();
    uow.commit().await?;
    info!(
        "Bootstrap seeded {} change(s) for master tenant {} (admin {})",
        changes,
        master_id,
        mask_email(&email)
    );
    Ok(BootstrapOutcome::Seeded { changes })
}
