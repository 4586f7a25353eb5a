//! User groups

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use tenancy_shared::types::Pagination;

use crate::context::RequestContext;
use crate::domain::{User, UserGroup};
use crate::error::DomainError;
use crate::repositories::{StoreBackend, TenantStore};
use crate::services::entitlements::FeatureService;
use crate::services::role_service::{members, same_tenant};

#[derive(Debug, Clone, Default)]
pub struct NewUserGroup {
    pub name: String,
    pub description: String,
    pub tenant_id: Option<Uuid>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserGroupChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct UserGroupService {
    backend: Arc<dyn StoreBackend>,
    features: FeatureService,
}

impl UserGroupService {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { features: FeatureService::new(backend.clone()), backend }
    }

    fn store(&self, ctx: &RequestContext) -> TenantStore {
        TenantStore::new(self.backend.clone(), ctx.tenant())
    }

    pub async fn list(&self, ctx: &RequestContext, page: &Pagination) -> Result<Vec<UserGroup>, DomainError> {
        let groups = self.store(ctx).owned::<UserGroup>().list().await?;
        Ok(page.apply(groups))
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<UserGroup, DomainError> {
        self.store(ctx).owned::<UserGroup>().require(id).await
    }

    pub async fn create(&self, ctx: &RequestContext, input: NewUserGroup) -> Result<UserGroup, DomainError> {
        let mut group = UserGroup::new(input.name, input.description)?;
        group.tenant_id = input.tenant_id.unwrap_or_default();
        for feature in &input.features {
            self.features.ensure_subscribed(ctx, feature).await?;
            group.features.add(feature);
        }

        let store = self.store(ctx);
        let mut uow = store.begin();
        uow.insert(group.clone());
        uow.commit().await?;

        let group = store.owned::<UserGroup>().require(group.id).await?;
        info!("Group created: {} ({}) in tenant {}", group.name, group.id, group.tenant_id);
        Ok(group)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        changes: UserGroupChanges,
    ) -> Result<UserGroup, DomainError> {
        let store = self.store(ctx);
        let mut group = store.owned::<UserGroup>().require(id).await?;

        if let Some(name) = changes.name {
            group.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            group.description = description.trim().to_string();
        }
        group.validate()?;

        let mut uow = store.begin();
        uow.update(group.clone());
        uow.commit().await?;
        Ok(group)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), DomainError> {
        let store = self.store(ctx);
        let group = store.owned::<UserGroup>().require(id).await?;

        let mut uow = store.begin();
        for mut user in members(&store, &group.user_ids).await? {
            user.leave_group(id);
            uow.update(user);
        }
        uow.delete::<UserGroup>(id);
        uow.commit().await?;

        info!("Group deleted: {}", id);
        Ok(())
    }

    pub async fn add_user(&self, ctx: &RequestContext, group_id: Uuid, user_id: Uuid) -> Result<UserGroup, DomainError> {
        let store = self.store(ctx);
        let mut group = store.owned::<UserGroup>().require(group_id).await?;
        let mut user = store.owned::<User>().require(user_id).await?;
        same_tenant(group.tenant_id, user.tenant_id)?;

        group.add_user(user_id);
        user.join_group(group_id);

        let mut uow = store.begin();
        uow.update(group.clone()).update(user);
        uow.commit().await?;
        Ok(group)
    }

    pub async fn remove_user(&self, ctx: &RequestContext, group_id: Uuid, user_id: Uuid) -> Result<UserGroup, DomainError> {
        let store = self.store(ctx);
        let mut group = store.owned::<UserGroup>().require(group_id).await?;
        group.remove_user(user_id);

        let mut uow = store.begin();
        if let Some(mut user) = store.owned::<User>().get(user_id).await? {
            user.leave_group(group_id);
            uow.update(user);
        }
        uow.update(group.clone());
        uow.commit().await?;
        Ok(group)
    }

    pub async fn add_feature(&self, ctx: &RequestContext, group_id: Uuid, feature: &str) -> Result<UserGroup, DomainError> {
        let store = self.store(ctx);
        let mut group = store.owned::<UserGroup>().require(group_id).await?;
        self.features.ensure_subscribed(ctx, feature).await?;

        if group.features.add(feature) {
            let mut uow = store.begin();
            uow.update(group.clone());
            uow.commit().await?;
        }
        Ok(group)
    }

    pub async fn remove_feature(&self, ctx: &RequestContext, group_id: Uuid, feature: &str) -> Result<UserGroup, DomainError> {
        let store = self.store(ctx);
        let mut group = store.owned::<UserGroup>().require(group_id).await?;

        if group.features.remove(feature) {
            let mut uow = store.begin();
            uow.update(group.clone());
            uow.commit().await?;
        }
        Ok(group)
    }
}
