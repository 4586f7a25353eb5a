// ============================================================================
// Tenancy Core - Tenant Entity
// File: crates/tenancy-core/src/domain/tenant.rs
// Description: Tenant (company) with optional subscription
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::entity::{Entity, Unowned};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Tenant entity.
///
/// A tenant owns itself: its id doubles as its tenant id, and it is never subject
/// to row filtering. Only the master may manage tenants.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Tenant {
    pub id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Tenant name must be between 2 and 100 characters"))]
    pub tenant_name: String,

    #[validate(length(min = 2, max = 200, message = "Company name must be between 2 and 200 characters"))]
    pub company_name: String,

    #[validate(email(message = "Admin email is not a valid address"))]
    pub admin_email: String,

    #[serde(default)]
    pub address: Address,

    pub subscription_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

impl Tenant {
    pub fn new(
        tenant_name: String,
        company_name: String,
        admin_email: String,
    ) -> Result<Self, validator::ValidationErrors> {
        let tenant = Self {
            id: Uuid::new_v4(),
            tenant_name: tenant_name.trim().to_string(),
            company_name: company_name.trim().to_string(),
            admin_email: admin_email.trim().to_string(),
            address: Address::default(),
            subscription_id: None,
            created_at: Utc::now(),
        };

        tenant.validate()?;
        Ok(tenant)
    }

    /// Fixes the id up front, used for the configured master tenant.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn tenant_id(&self) -> Uuid {
        self.id
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = address;
    }
}

impl Entity for Tenant {
    const TABLE: &'static str = "tenants";
    const NAME: &'static str = "Tenant";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn owner(&self) -> Option<Uuid> {
        Some(self.id)
    }
}

impl Unowned for Tenant {}
