// ============================================================================
// Tenancy Core - API Key Entity
// File: crates/tenancy-core/src/domain/api_key.rs
// Description: Dynamic per-tenant credential
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tenancy_shared::constants::{MAX_API_KEY_LENGTH, MAX_LABEL_LENGTH, MIN_API_KEY_LENGTH};

use super::entity::{Entity, Owned};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiKey {
    pub id: Uuid,
    pub tenant_id: Uuid,

    /// Secret value, unique across all tenants.
    #[validate(length(min = MIN_API_KEY_LENGTH, max = MAX_API_KEY_LENGTH, message = "Key must be between 16 and 256 characters"))]
    pub key: String,

    #[validate(length(min = 1, max = MAX_LABEL_LENGTH, message = "Label must be between 1 and 100 characters"))]
    pub label: String,

    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    pub fn new(
        key: String,
        label: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self, validator::ValidationErrors> {
        let api_key = Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            key,
            label: label.trim().to_string(),
            is_active: true,
            expires_at,
            created_at: Utc::now(),
        };

        api_key.validate()?;
        Ok(api_key)
    }

    /// New key with a freshly generated secret.
    pub fn generate(
        label: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self, validator::ValidationErrors> {
        Self::new(tenancy_security::generate_api_key(), label, expires_at)
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

impl Entity for ApiKey {
    const TABLE: &'static str = "api_keys";
    const NAME: &'static str = "ApiKey";
    const UNIQUE: &'static [&'static str] = &["key"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn owner(&self) -> Option<Uuid> {
        Some(self.tenant_id)
    }
}

impl Owned for ApiKey {
    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    fn set_tenant_id(&mut self, tenant_id: Uuid) {
        self.tenant_id = tenant_id;
    }
}
