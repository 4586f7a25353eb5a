// ============================================================================
// Tenancy Core - Role Service
// File: crates/tenancy-core/src/services/role_service.rs
// ============================================================================

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use tenancy_shared::types::Pagination;

use crate::context::RequestContext;
use crate::domain::{Role, User};
use crate::error::DomainError;
use crate::repositories::{Criterion, Query, StoreBackend, TenantStore};
use crate::services::entitlements::FeatureService;

#[derive(Debug, Clone, Default)]
pub struct NewRole {
    pub title: String,
    pub description: String,
    /// Honoured for the master only; a tenant caller's value is replaced on commit.
    pub tenant_id: Option<Uuid>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RoleChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct RoleService {
    backend: Arc<dyn StoreBackend>,
    features: FeatureService,
}

impl RoleService {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { features: FeatureService::new(backend.clone()), backend }
    }

    fn store(&self, ctx: &RequestContext) -> TenantStore {
        TenantStore::new(self.backend.clone(), ctx.tenant())
    }

    pub async fn list(&self, ctx: &RequestContext, page: &Pagination) -> Result<Vec<Role>, DomainError> {
        let roles = self.store(ctx).owned::<Role>().list().await?;
        Ok(page.apply(roles))
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Role, DomainError> {
        self.store(ctx).owned::<Role>().require(id).await
    }

    pub async fn create(&self, ctx: &RequestContext, input: NewRole) -> Result<Role, DomainError> {
        let mut role = Role::new(input.title, input.description)?;
        role.tenant_id = input.tenant_id.unwrap_or_default();
        for feature in &input.features {
            self.features.ensure_subscribed(ctx, feature).await?;
            role.features.add(feature);
        }

        let store = self.store(ctx);
        let mut uow = store.begin();
        uow.insert(role.clone());
        uow.commit().await?;

        let role = store.owned::<Role>().require(role.id).await?;
        info!("Role created: {} ({}) in tenant {}", role.title, role.id, role.tenant_id);
        Ok(role)
    }

    pub async fn update(&self, ctx: &RequestContext, id: Uuid, changes: RoleChanges) -> Result<Role, DomainError> {
        let store = self.store(ctx);
        let mut role = store.owned::<Role>().require(id).await?;

        if let Some(title) = changes.title {
            role.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            role.description = description.trim().to_string();
        }
        role.validate()?;

        let mut uow = store.begin();
        uow.update(role.clone());
        uow.commit().await?;
        Ok(role)
    }

    /// Removes the role and drops it from its members' role lists.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), DomainError> {
        let store = self.store(ctx);
        let role = store.owned::<Role>().require(id).await?;

        let mut uow = store.begin();
        for mut user in members(&store, &role.user_ids).await? {
            user.remove_role(id);
            uow.update(user);
        }
        uow.delete::<Role>(id);
        uow.commit().await?;

        info!("Role deleted: {}", id);
        Ok(())
    }

    pub async fn add_user(&self, ctx: &RequestContext, role_id: Uuid, user_id: Uuid) -> Result<Role, DomainError> {
        let store = self.store(ctx);
        let mut role = store.owned::<Role>().require(role_id).await?;
        let mut user = store.owned::<User>().require(user_id).await?;
        same_tenant(role.tenant_id, user.tenant_id)?;

        role.add_user(user_id);
        user.add_role(role_id);

        let mut uow = store.begin();
        uow.update(role.clone()).update(user);
        uow.commit().await?;
        Ok(role)
    }

    pub async fn remove_user(&self, ctx: &RequestContext, role_id: Uuid, user_id: Uuid) -> Result<Role, DomainError> {
        let store = self.store(ctx);
        let mut role = store.owned::<Role>().require(role_id).await?;
        role.remove_user(user_id);

        let mut uow = store.begin();
        if let Some(mut user) = store.owned::<User>().get(user_id).await? {
            user.remove_role(role_id);
            uow.update(user);
        }
        uow.update(role.clone());
        uow.commit().await?;
        Ok(role)
    }

    pub async fn add_feature(&self, ctx: &RequestContext, role_id: Uuid, feature: &str) -> Result<Role, DomainError> {
        let store = self.store(ctx);
        let mut role = store.owned::<Role>().require(role_id).await?;
        self.features.ensure_subscribed(ctx, feature).await?;

        if role.features.add(feature) {
            let mut uow = store.begin();
            uow.update(role.clone());
            uow.commit().await?;
        }
        Ok(role)
    }

    pub async fn remove_feature(&self, ctx: &RequestContext, role_id: Uuid, feature: &str) -> Result<Role, DomainError> {
        let store = self.store(ctx);
        let mut role = store.owned::<Role>().require(role_id).await?;

        if role.features.remove(feature) {
            let mut uow = store.begin();
            uow.update(role.clone());
            uow.commit().await?;
        }
        Ok(role)
    }
}

pub(crate) async fn members(store: &TenantStore, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    store
        .owned::<User>()
        .find(&Query::all().with(Criterion::IdIn(ids.to_vec())))
        .await
}

/// Membership links never cross tenants, not even when the master creates them.
pub(crate) fn same_tenant(left: Uuid, right: Uuid) -> Result<(), DomainError> {
    if left != right {
        return Err(DomainError::ValidationError(
            "members must belong to the same tenant".into(),
        ));
    }
    Ok(())
}
