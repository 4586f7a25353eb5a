// ============================================================================
// Tenancy API - DTOs
// File: crates/tenancy-api/src/dto.rs
// ============================================================================
//! Request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tenancy_core::domain::{Address, ApiKey};
use tenancy_core::services::{
    ApiKeyChanges, NewApiKey, NewRole, NewTenant, NewUser, NewUserGroup, Registration, RegistrationOutcome,
    RoleChanges, SubscriptionChanges, TenantChanges, UserChanges, UserGroupChanges,
};
use tenancy_shared::constants::{MAX_API_KEY_LENGTH, MAX_LABEL_LENGTH, MIN_API_KEY_LENGTH};
use tenancy_shared::utils::mask_secret;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenantRequest {
    pub id: Option<Uuid>,
    #[validate(length(min = 2, max = 100))]
    pub tenant_name: String,
    #[validate(length(min = 2, max = 200))]
    pub company_name: String,
    #[validate(email)]
    pub admin_email: String,
    pub address: Option<Address>,
    pub subscription_id: Option<Uuid>,
}

impl From<CreateTenantRequest> for NewTenant {
    fn from(req: CreateTenantRequest) -> Self {
        NewTenant {
            id: req.id,
            tenant_name: req.tenant_name,
            company_name: req.company_name,
            admin_email: req.admin_email,
            address: req.address,
            subscription_id: req.subscription_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTenantRequest {
    pub tenant_name: Option<String>,
    pub company_name: Option<String>,
    pub admin_email: Option<String>,
    pub address: Option<Address>,
    /// `null` clears the subscription, absence leaves it unchanged.
    #[serde(default, deserialize_with = "double_option")]
    pub subscription_id: Option<Option<Uuid>>,
}

impl From<UpdateTenantRequest> for TenantChanges {
    fn from(req: UpdateTenantRequest) -> Self {
        TenantChanges {
            tenant_name: req.tenant_name,
            company_name: req.company_name,
            admin_email: req.admin_email,
            address: req.address,
            subscription_id: req.subscription_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
}

impl From<UpdateSubscriptionRequest> for SubscriptionChanges {
    fn from(req: UpdateSubscriptionRequest) -> Self {
        SubscriptionChanges {
            name: req.name,
            description: req.description,
            features: req.features,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 2, max = 100))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl From<CreateRoleRequest> for NewRole {
    fn from(req: CreateRoleRequest) -> Self {
        NewRole {
            title: req.title,
            description: req.description,
            tenant_id: req.tenant_id,
            features: req.features,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRoleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateRoleRequest> for RoleChanges {
    fn from(req: UpdateRoleRequest) -> Self {
        RoleChanges { title: req.title, description: req.description }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub identity_provider_id: String,
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        NewUser {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            identity_provider_id: req.identity_provider_id,
            tenant_id: req.tenant_id,
            features: req.features,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub identity_provider_id: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        UserChanges {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            identity_provider_id: req.identity_provider_id,
        }
    }
}

/// Sent by the identity gateway after a successful sign-in.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginSyncRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub identity_provider_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl From<CreateGroupRequest> for NewUserGroup {
    fn from(req: CreateGroupRequest) -> Self {
        NewUserGroup {
            name: req.name,
            description: req.description,
            tenant_id: req.tenant_id,
            features: req.features,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateGroupRequest> for UserGroupChanges {
    fn from(req: UpdateGroupRequest) -> Self {
        UserGroupChanges { name: req.name, description: req.description }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateApiKeyRequest {
    #[validate(length(min = MIN_API_KEY_LENGTH, max = MAX_API_KEY_LENGTH))]
    pub key: Option<String>,
    #[validate(length(min = 1, max = MAX_LABEL_LENGTH))]
    pub label: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub tenant_id: Option<Uuid>,
}

impl From<CreateApiKeyRequest> for NewApiKey {
    fn from(req: CreateApiKeyRequest) -> Self {
        NewApiKey {
            key: req.key,
            label: req.label,
            expires_at: req.expires_at,
            tenant_id: req.tenant_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateApiKeyRequest {
    pub label: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
}

impl From<UpdateApiKeyRequest> for ApiKeyChanges {
    fn from(req: UpdateApiKeyRequest) -> Self {
        ApiKeyChanges {
            label: req.label,
            expires_at: req.expires_at,
            is_active: req.is_active,
        }
    }
}

/// Key as listed. The secret is masked everywhere except in the create response.
#[derive(Debug, Serialize)]
pub struct ApiKeyDto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub key: String,
    pub label: String,
    pub is_active: bool,
    pub is_valid: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ApiKeyDto {
    pub fn masked(key: ApiKey) -> Self {
        Self {
            key: mask_secret(&key.key),
            ..Self::revealed(key)
        }
    }

    pub fn revealed(key: ApiKey) -> Self {
        Self {
            id: key.id,
            tenant_id: key.tenant_id,
            is_valid: key.is_valid(),
            key: key.key,
            label: key.label,
            is_active: key.is_active,
            expires_at: key.expires_at,
            created_at: key.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 2, max = 100))]
    pub tenant_name: String,
    #[validate(length(min = 2, max = 200))]
    pub company_name: String,
    #[validate(email)]
    pub admin_email: String,
    #[serde(default)]
    pub admin_first_name: String,
    #[serde(default)]
    pub admin_last_name: String,
    #[serde(default)]
    pub admin_identity_provider_id: String,
    pub address: Option<Address>,
    pub subscription_id: Option<Uuid>,
    pub key_label: Option<String>,
}

impl From<RegistrationRequest> for Registration {
    fn from(req: RegistrationRequest) -> Self {
        Registration {
            tenant_name: req.tenant_name,
            company_name: req.company_name,
            admin_email: req.admin_email,
            admin_first_name: req.admin_first_name,
            admin_last_name: req.admin_last_name,
            admin_identity_provider_id: req.admin_identity_provider_id,
            address: req.address,
            subscription_id: req.subscription_id,
            key_label: req.key_label,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub tenant_id: Uuid,
    pub admin_user_id: Uuid,
    pub admin_role_id: Uuid,
    pub api_key: String,
}

impl From<RegistrationOutcome> for RegistrationResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        Self {
            tenant_id: outcome.tenant_id,
            admin_user_id: outcome.admin_user_id,
            admin_role_id: outcome.admin_role_id,
            api_key: outcome.api_key,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeatureDecision {
    pub feature: String,
    pub enabled: bool,
}

/// Distinguishes an explicit `null` from an absent field.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
