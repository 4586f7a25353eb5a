//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::entity::{Entity, Owned};
use super::features::FeatureSet;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: String,

    /// Linkage to the external identity provider (object id / subject).
    #[validate(length(max = 100))]
    pub identity_provider_id: String,

    pub last_login_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub role_ids: Vec<Uuid>,
    #[serde(default)]
    pub features: FeatureSet,
    #[serde(default)]
    pub group_ids: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        identity_provider_id: String,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            email: email.trim().to_lowercase(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            identity_provider_id: identity_provider_id.trim().to_string(),
            last_login_at: None,
            role_ids: Vec::new(),
            features: FeatureSet::new(),
            group_ids: Vec::new(),
            created_at: Utc::now(),
        };

        user.validate()?;
        Ok(user)
    }

    pub fn username(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn is_assigned_to_tenant(&self) -> bool {
        !self.tenant_id.is_nil()
    }

    pub fn add_role(&mut self, role_id: Uuid) {
        if !self.role_ids.contains(&role_id) {
            self.role_ids.push(role_id);
        }
    }

    pub fn remove_role(&mut self, role_id: Uuid) {
        self.role_ids.retain(|id| *id != role_id);
    }

    pub fn join_group(&mut self, group_id: Uuid) {
        if !self.group_ids.contains(&group_id) {
            self.group_ids.push(group_id);
        }
    }

    pub fn leave_group(&mut self, group_id: Uuid) {
        self.group_ids.retain(|id| *id != group_id);
    }

    pub fn record_login(&mut self, identity_provider_id: &str) {
        self.identity_provider_id = identity_provider_id.to_string();
        self.last_login_at = Some(Utc::now());
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const NAME: &'static str = "User";

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

impl Owned for User {
    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    fn set_tenant_id(&mut self, tenant_id: Uuid) {
        self.tenant_id = tenant_id;
    }
}
