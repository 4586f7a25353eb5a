// ============================================================================
// Tenancy Core - User Service
// File: crates/tenancy-core/src/services/user_service.rs
// Description: Tenant users, direct feature grants and role assignment
// ============================================================================

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use tenancy_shared::types::Pagination;
use tenancy_shared::utils::mask_email;

use crate::context::RequestContext;
use crate::domain::{Role, User, UserGroup};
use crate::error::DomainError;
use crate::repositories::{Criterion, Query, StoreBackend, TenantStore};
use crate::services::entitlements::FeatureService;
use crate::services::role_service::same_tenant;

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub identity_provider_id: String,
    pub tenant_id: Option<Uuid>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub identity_provider_id: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    backend: Arc<dyn StoreBackend>,
    features: FeatureService,
}

impl UserService {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { features: FeatureService::new(backend.clone()), backend }
    }

    fn store(&self, ctx: &RequestContext) -> TenantStore {
        TenantStore::new(self.backend.clone(), ctx.tenant())
    }

    /// Tenant a new row will end up in once stamped.
    fn target_tenant(ctx: &RequestContext, requested: Option<Uuid>) -> Uuid {
        match requested {
            Some(id) if ctx.is_master() && !id.is_nil() => id,
            _ => ctx.tenant_id(),
        }
    }

    /// Email lookups only ever see the caller's visible rows of `tenant_id`.
    async fn find_email(&self, store: &TenantStore, tenant_id: Uuid, email: &str) -> Result<Option<User>, DomainError> {
        let query = Query::all()
            .with(Criterion::TenantIs(tenant_id))
            .field_eq("email", email.trim().to_lowercase());
        store.owned::<User>().first(&query).await
    }

    pub async fn list(&self, ctx: &RequestContext, page: &Pagination) -> Result<Vec<User>, DomainError> {
        let users = self.store(ctx).owned::<User>().list().await?;
        Ok(page.apply(users))
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<User, DomainError> {
        self.store(ctx).owned::<User>().require(id).await
    }

    pub async fn get_by_email(&self, ctx: &RequestContext, email: &str) -> Result<User, DomainError> {
        self.find_email(&self.store(ctx), ctx.tenant_id(), email)
            .await?
            .ok_or_else(|| DomainError::not_found("User", mask_email(email)))
    }

    pub async fn create(&self, ctx: &RequestContext, input: NewUser) -> Result<User, DomainError> {
        let store = self.store(ctx);
        let mut user = User::new(input.email, input.first_name, input.last_name, input.identity_provider_id)?;
        user.tenant_id = input.tenant_id.unwrap_or_default();

        let target = Self::target_tenant(ctx, input.tenant_id);
        if self.find_email(&store, target, &user.email).await?.is_some() {
            return Err(DomainError::Conflict(format!("user {}", mask_email(&user.email))));
        }

        for feature in &input.features {
            self.features.ensure_subscribed(ctx, feature).await?;
            user.features.add(feature);
        }

        let mut uow = store.begin();
        uow.insert(user.clone());
        uow.commit().await?;

        let user = store.owned::<User>().require(user.id).await?;
        info!("User created: {} in tenant {}", mask_email(&user.email), user.tenant_id);
        Ok(user)
    }

    pub async fn update(&self, ctx: &RequestContext, id: Uuid, changes: UserChanges) -> Result<User, DomainError> {
        let store = self.store(ctx);
        let mut user = store.owned::<User>().require(id).await?;

        if let Some(email) = changes.email {
            let email = email.trim().to_lowercase();
            if email != user.email {
                if self.find_email(&store, user.tenant_id, &email).await?.is_some() {
                    return Err(DomainError::Conflict(format!("user {}", mask_email(&email))));
                }
                user.email = email;
            }
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(idp) = changes.identity_provider_id {
            user.identity_provider_id = idp.trim().to_string();
        }
        user.validate()?;

        let mut uow = store.begin();
        uow.update(user.clone());
        uow.commit().await?;
        Ok(user)
    }

    /// Removes the user together with its role and group memberships.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), DomainError> {
        let store = self.store(ctx);
        let user = store.owned::<User>().require(id).await?;

        let mut uow = store.begin();
        if !user.role_ids.is_empty() {
            let roles = store
                .owned::<Role>()
                .find(&Query::all().with(Criterion::IdIn(user.role_ids.clone())))
                .await?;
            for mut role in roles {
                role.remove_user(id);
                uow.update(role);
            }
        }
        let groups = store
            .owned::<UserGroup>()
            .find(&Query::all().field_contains("user_ids", id.to_string()))
            .await?;
        for mut group in groups {
            group.remove_user(id);
            uow.update(group);
        }
        uow.delete::<User>(id);
        uow.commit().await?;

        info!("User deleted: {}", id);
        Ok(())
    }

    pub async fn delete_by_email(&self, ctx: &RequestContext, email: &str) -> Result<(), DomainError> {
        let user = self.get_by_email(ctx, email).await?;
        self.delete(ctx, user.id).await
    }

    pub async fn add_feature(&self, ctx: &RequestContext, user_id: Uuid, feature: &str) -> Result<User, DomainError> {
        let store = self.store(ctx);
        let mut user = store.owned::<User>().require(user_id).await?;
        self.features.ensure_subscribed(ctx, feature).await?;

        if user.features.add(feature) {
            let mut uow = store.begin();
            uow.update(user.clone());
            uow.commit().await?;
        }
        Ok(user)
    }

    pub async fn remove_feature(&self, ctx: &RequestContext, user_id: Uuid, feature: &str) -> Result<User, DomainError> {
        let store = self.store(ctx);
        let mut user = store.owned::<User>().require(user_id).await?;

        if user.features.remove(feature) {
            let mut uow = store.begin();
            uow.update(user.clone());
            uow.commit().await?;
        }
        Ok(user)
    }

    pub async fn assign_role(&self, ctx: &RequestContext, user_id: Uuid, role_id: Uuid) -> Result<User, DomainError> {
        let store = self.store(ctx);
        let mut user = store.owned::<User>().require(user_id).await?;
        let mut role = store.owned::<Role>().require(role_id).await?;
        same_tenant(user.tenant_id, role.tenant_id)?;

        user.add_role(role_id);
        role.add_user(user_id);

        let mut uow = store.begin();
        uow.update(user.clone()).update(role);
        uow.commit().await?;
        Ok(user)
    }

    pub async fn unassign_role(&self, ctx: &RequestContext, user_id: Uuid, role_id: Uuid) -> Result<User, DomainError> {
        let store = self.store(ctx);
        let mut user = store.owned::<User>().require(user_id).await?;
        user.remove_role(role_id);

        let mut uow = store.begin();
        if let Some(mut role) = store.owned::<Role>().get(role_id).await? {
            role.remove_user(user_id);
            uow.update(role);
        }
        uow.update(user.clone());
        uow.commit().await?;
        Ok(user)
    }

    /// Called after an identity-provider sign-in: refreshes the linkage id and login
    /// time of the user with `email`, or creates the user in the current tenant.
    pub async fn upsert_after_login(
        &self,
        ctx: &RequestContext,
        email: &str,
        identity_provider_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, DomainError> {
        let store = self.store(ctx);

        if let Some(mut user) = self.find_email(&store, ctx.tenant_id(), email).await? {
            user.record_login(identity_provider_id);
            let mut uow = store.begin();
            uow.update(user.clone());
            uow.commit().await?;
            return Ok(user);
        }

        let mut user = User::new(
            email.to_string(),
            first_name.to_string(),
            last_name.to_string(),
            identity_provider_id.to_string(),
        )?;
        user.last_login_at = Some(Utc::now());

        let mut uow = store.begin();
        uow.insert(user.clone());
        uow.commit().await?;

        info!("User provisioned at login: {}", mask_email(&user.email));
        store.owned::<User>().require(user.id).await
    }
}
