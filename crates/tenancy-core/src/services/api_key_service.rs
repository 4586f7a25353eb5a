// ============================================================================
// Tenancy Core - API Key Service
// File: crates/tenancy-core/src/services/api_key_service.rs
// Description: Management of dynamic tenant keys
// ============================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use tenancy_shared::types::Pagination;

use crate::context::RequestContext;
use crate::domain::ApiKey;
use crate::error::DomainError;
use crate::repositories::{StoreBackend, TenantStore};

#[derive(Debug, Clone, Default)]
pub struct NewApiKey {
    /// Generated when absent.
    pub key: Option<String>,
    pub label: String,
    pub expires_at: Option<DateTime<Utc>>,
    /// Target tenant; only the master may name one.
    pub tenant_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiKeyChanges {
    pub label: Option<String>,
    /// `Some(None)` removes the expiry.
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct ApiKeyService {
    backend: Arc<dyn StoreBackend>,
}

impl ApiKeyService {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    fn store(&self, ctx: &RequestContext) -> TenantStore {
        TenantStore::new(self.backend.clone(), ctx.tenant())
    }

    pub async fn list(&self, ctx: &RequestContext, page: &Pagination) -> Result<Vec<ApiKey>, DomainError> {
        let keys = self.store(ctx).owned::<ApiKey>().list().await?;
        Ok(page.apply(keys))
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<ApiKey, DomainError> {
        self.store(ctx).owned::<ApiKey>().require(id).await
    }

    /// A duplicate secret fails with `Conflict` at commit.
    pub async fn create(&self, ctx: &RequestContext, input: NewApiKey) -> Result<ApiKey, DomainError> {
        let mut key = match input.key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            Some(secret) => ApiKey::new(secret, input.label, input.expires_at)?,
            None => ApiKey::generate(input.label, input.expires_at)?,
        };
        key.tenant_id = input.tenant_id.unwrap_or_default();

        let store = self.store(ctx);
        let mut uow = store.begin();
        uow.insert(key.clone());
        uow.commit().await?;

        let key = store.owned::<ApiKey>().require(key.id).await?;
        info!("API key '{}' created for tenant {}", key.label, key.tenant_id);
        Ok(key)
    }

    pub async fn update(&self, ctx: &RequestContext, id: Uuid, changes: ApiKeyChanges) -> Result<ApiKey, DomainError> {
        let store = self.store(ctx);
        let mut key = store.owned::<ApiKey>().require(id).await?;

        if let Some(label) = changes.label {
            key.label = label.trim().to_string();
        }
        if let Some(expires_at) = changes.expires_at {
            key.expires_at = expires_at;
        }
        if let Some(active) = changes.is_active {
            key.is_active = active;
        }
        key.validate()?;

        let mut uow = store.begin();
        uow.update(key.clone());
        uow.commit().await?;
        Ok(key)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), DomainError> {
        let mut uow = self.store(ctx).begin();
        uow.delete::<ApiKey>(id);
        uow.commit().await?;

        info!("API key deleted: {}", id);
        Ok(())
    }

    pub async fn activate(&self, ctx: &RequestContext, id: Uuid) -> Result<ApiKey, DomainError> {
        self.update(ctx, id, ApiKeyChanges { is_active: Some(true), ..Default::default() })
            .await
    }

    pub async fn deactivate(&self, ctx: &RequestContext, id: Uuid) -> Result<ApiKey, DomainError> {
        self.update(ctx, id, ApiKeyChanges { is_active: Some(false), ..Default::default() })
            .await
    }
}
