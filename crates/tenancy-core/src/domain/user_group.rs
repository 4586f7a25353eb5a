// ============================================================================
// Tenancy Core - User Group Entity
// File: crates/tenancy-core/src/domain/user_group.rs
// Description: Per-tenant group with feature grants and members
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::entity::{Entity, Owned};
use super::features::FeatureSet;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserGroup {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Group name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: String,

    #[serde(default)]
    pub features: FeatureSet,

    /// Member user ids. Mirrors `User::group_ids`.
    #[serde(default)]
    pub user_ids: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
}

impl UserGroup {
    pub fn new(name: String, description: String) -> Result<Self, validator::ValidationErrors> {
        let group = Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            features: FeatureSet::new(),
            user_ids: Vec::new(),
            created_at: Utc::now(),
        };

        group.validate()?;
        Ok(group)
    }

    pub fn add_user(&mut self, user_id: Uuid) {
        if !self.user_ids.contains(&user_id) {
            self.user_ids.push(user_id);
        }
    }

    pub fn remove_user(&mut self, user_id: Uuid) {
        self.user_ids.retain(|id| *id != user_id);
    }

    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.user_ids.contains(&user_id)
    }
}

impl Entity for UserGroup {
    const TABLE: &'static str = "user_groups";
    const NAME: &'static str = "UserGroup";

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

impl Owned for UserGroup {
    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    fn set_tenant_id(&mut self, tenant_id: Uuid) {
        self.tenant_id = tenant_id;
    }
}
