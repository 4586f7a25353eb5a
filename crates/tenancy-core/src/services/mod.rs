//! Domain services (business logic)
//!
//! Services are stateless apart from the store handle. Each call takes the
//! [`RequestContext`](crate::context::RequestContext) of the request it serves.

pub mod api_key_validator;
pub mod context_resolver;
pub mod entitlements;
pub mod tenant_service;
pub mod subscription_service;
pub mod role_service;
pub mod user_service;
pub mod user_group_service;
pub mod api_key_service;
pub mod registration_service;
pub mod bootstrap;

use std::sync::Arc;

use tenancy_shared::config::AuthSettings;

use crate::repositories::StoreBackend;

pub use api_key_validator::{ApiKeyValidator, Credential};
pub use context_resolver::{ContextResolver, PresentedCredentials};
pub use entitlements::{EntitlementFacts, FeatureService};
pub use tenant_service::{NewTenant, TenantChanges, TenantService};
pub use subscription_service::{SubscriptionChanges, SubscriptionService};
pub use role_service::{NewRole, RoleChanges, RoleService};
pub use user_service::{NewUser, UserChanges, UserService};
pub use user_group_service::{NewUserGroup, UserGroupChanges, UserGroupService};
pub use api_key_service::{ApiKeyChanges, ApiKeyService, NewApiKey};
pub use registration_service::{Registration, RegistrationOutcome, RegistrationService};
pub use bootstrap::BootstrapOutcome;

/// Every service, wired to one backend.
#[derive(Clone)]
pub struct Services {
    pub resolver: ContextResolver,
    pub features: FeatureService,
    pub tenants: TenantService,
    pub subscriptions: SubscriptionService,
    pub roles: RoleService,
    pub users: UserService,
    pub groups: UserGroupService,
    pub api_keys: ApiKeyService,
    pub registrations: RegistrationService,
}

impl Services {
    pub fn new(backend: Arc<dyn StoreBackend>, auth: &AuthSettings) -> Self {
        let validator = Arc::new(ApiKeyValidator::new(backend.clone(), auth));
        Self {
            resolver: ContextResolver::new(validator),
            features: FeatureService::new(backend.clone()),
            tenants: TenantService::new(backend.clone()),
            subscriptions: SubscriptionService::new(backend.clone()),
            roles: RoleService::new(backend.clone()),
            users: UserService::new(backend.clone()),
            groups: UserGroupService::new(backend.clone()),
            api_keys: ApiKeyService::new(backend.clone()),
            registrations: RegistrationService::new(backend),
        }
    }
}
