//! Subscription catalogue

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use tenancy_shared::types::Pagination;

use crate::context::RequestContext;
use crate::domain::{FeatureSet, Subscription};
use crate::error::DomainError;
use crate::repositories::{StoreBackend, TenantStore};
use crate::services::tenant_service::require_master;

#[derive(Debug, Clone, Default)]
pub struct SubscriptionChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
}

/// Shared by all tenants: anyone authenticated may read, only the master may write.
#[derive(Clone)]
pub struct SubscriptionService {
    backend: Arc<dyn StoreBackend>,
}

impl SubscriptionService {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    fn store(&self, ctx: &RequestContext) -> TenantStore {
        TenantStore::new(self.backend.clone(), ctx.tenant())
    }

    pub async fn list(&self, ctx: &RequestContext, page: &Pagination) -> Result<Vec<Subscription>, DomainError> {
        let subscriptions = self.store(ctx).unowned::<Subscription>().list().await?;
        Ok(page.apply(subscriptions))
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Subscription, DomainError> {
        self.store(ctx).unowned::<Subscription>().require(id).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: String,
        description: String,
        features: Vec<String>,
    ) -> Result<Subscription, DomainError> {
        require_master(ctx, "create subscription")?;

        let subscription = Subscription::new(name, description, features.iter().collect())?;
        let mut uow = self.store(ctx).begin();
        uow.insert_unowned(subscription.clone());
        uow.commit().await?;

        info!("Subscription created: {} ({})", subscription.name, subscription.id);
        Ok(subscription)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        changes: SubscriptionChanges,
    ) -> Result<Subscription, DomainError> {
        require_master(ctx, "update subscription")?;
        let store = self.store(ctx);
        let mut subscription = store.unowned::<Subscription>().require(id).await?;

        if let Some(name) = changes.name {
            subscription.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            subscription.description = description.trim().to_string();
        }
        if let Some(features) = changes.features {
            subscription.features = features.iter().collect::<FeatureSet>();
        }
        subscription.validate()?;

        let mut uow = store.begin();
        uow.update_unowned(subscription.clone());
        uow.commit().await?;
        Ok(subscription)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), DomainError> {
        require_master(ctx, "delete subscription")?;

        let mut uow = self.store(ctx).begin();
        uow.delete_unowned::<Subscription>(id);
        uow.commit().await?;

        info!("Subscription deleted: {}", id);
        Ok(())
    }
}
