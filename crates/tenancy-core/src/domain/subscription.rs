// ============================================================================
// Tenancy Core - Subscription Entity
// File: crates/tenancy-core/src/domain/subscription.rs
// Description: Named bundle of feature flags
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::entity::{Entity, Unowned};
use super::features::FeatureSet;

/// Subscription plan. Part of the shared catalogue maintained by the master.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Subscription {
    pub id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Subscription name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: String,

    pub features: FeatureSet,

    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(
        name: String,
        description: String,
        features: FeatureSet,
    ) -> Result<Self, validator::ValidationErrors> {
        let subscription = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            features,
            created_at: Utc::now(),
        };

        subscription.validate()?;
        Ok(subscription)
    }

    pub fn includes(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }
}

impl Entity for Subscription {
    const TABLE: &'static str = "subscriptions";
    const NAME: &'static str = "Subscription";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn owner(&self) -> Option<Uuid> {
        None
    }
}

impl Unowned for Subscription {}
