#![allow(dead_code)]

use std::sync::Arc;

use uuid::Uuid;

use tenancy_core::context::{RequestContext, TenantContext};
use tenancy_core::domain::{Subscription, Tenant};
use tenancy_core::repositories::StoreBackend;
use tenancy_core::services::{NewTenant, Services};
use tenancy_infrastructure::MemoryStore;
use tenancy_shared::config::AuthSettings;

pub const MASTER_KEY: &str = "master-secret-for-tests";

pub struct Harness {
    pub store: MemoryStore,
    pub backend: Arc<dyn StoreBackend>,
    pub services: Services,
    pub master_tenant: Uuid,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let backend: Arc<dyn StoreBackend> = Arc::new(store.clone());
        let master_tenant = Uuid::new_v4();
        let services = Services::new(backend.clone(), &auth(master_tenant));
        Self { store, backend, services, master_tenant }
    }

    pub fn master(&self) -> RequestContext {
        master(self.master_tenant)
    }

    pub async fn tenant(&self, name: &str, subscription_id: Option<Uuid>) -> Tenant {
        self.services
            .tenants
            .create(
                &self.master(),
                NewTenant {
                    tenant_name: name.to_string(),
                    company_name: format!("{} Corp", name),
                    admin_email: format!("admin@{}.io", name.to_lowercase()),
                    subscription_id,
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    }

    pub async fn subscription(&self, name: &str, features: &[&str]) -> Subscription {
        self.services
            .subscriptions
            .create(
                &self.master(),
                name.to_string(),
                String::new(),
                features.iter().map(|f| f.to_string()).collect(),
            )
            .await
            .unwrap()
    }
}

pub fn auth(master_tenant: Uuid) -> AuthSettings {
    AuthSettings {
        master_api_key: MASTER_KEY.to_string(),
        master_tenant_id: Some(master_tenant),
        admin_email: Some("root@example.com".to_string()),
    }
}

pub fn master(tenant_id: Uuid) -> RequestContext {
    RequestContext::new(TenantContext::master(tenant_id), None)
}

pub fn tenant(tenant_id: Uuid) -> RequestContext {
    RequestContext::new(TenantContext::tenant(tenant_id), Some("test".to_string()))
}

pub fn acting(tenant_id: Uuid, subject: &str) -> RequestContext {
    tenant(tenant_id).with_subject(Some(subject.to_string()))
}
