// ============================================================================
// Tenancy Core - Role Entity
// File: crates/tenancy-core/src/domain/role.rs
// Description: Per-tenant role with feature grants and member ids
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::entity::{Entity, Owned};
use super::features::FeatureSet;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Role {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Role title must be between 2 and 100 characters"))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: String,

    #[serde(default)]
    pub features: FeatureSet,

    /// Member user ids. Mirrors `User::role_ids`.
    #[serde(default)]
    pub user_ids: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(title: String, description: String) -> Result<Self, validator::ValidationErrors> {
        let role = Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            features: FeatureSet::new(),
            user_ids: Vec::new(),
            created_at: Utc::now(),
        };

        role.validate()?;
        Ok(role)
    }

    pub fn add_user(&mut self, user_id: Uuid) {
        if !self.user_ids.contains(&user_id) {
            self.user_ids.push(user_id);
        }
    }

    pub fn remove_user(&mut self, user_id: Uuid) {
        self.user_ids.retain(|id| *id != user_id);
    }
}

impl Entity for Role {
    const TABLE: &'static str = "roles";
    const NAME: &'static str = "Role";

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

impl Owned for Role {
    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    fn set_tenant_id(&mut self, tenant_id: Uuid) {
        self.tenant_id = tenant_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_role_is_unassigned() {
        let role = Role::new("Admin".into(), String::new()).unwrap();
        assert!(!role.has_explicit_tenant());
    }

    #[test]
    fn membership_has_no_duplicates() {
        let mut role = Role::new("Admin".into(), String::new()).unwrap();
        let user = Uuid::new_v4();
        role.add_user(user);
        role.add_user(user);
        assert_eq!(role.user_ids, vec![user]);
        role.remove_user(user);
        assert!(role.user_ids.is_empty());
    }
}
