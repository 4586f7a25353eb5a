// ============================================================================
// Tenancy Core - Entitlement Resolver
// File: crates/tenancy-core/src/services/entitlements.rs
// Description: Layered feature-access decision for the calling context
// ============================================================================
//! Feature entitlements.
//!
//! A decision is an ordered chain of pure tiers over pre-gathered [`EntitlementFacts`].
//! Each tier either decides (`Some`) or defers (`None`); the first decision wins and the
//! chain ends in a default `false`. Gathering the facts is the only part that touches
//! the store, and it never writes.

use std::sync::Arc;

use tracing::debug;

use crate::context::RequestContext;
use crate::domain::{Role, Subscription, Tenant, User, UserGroup};
use crate::error::DomainError;
use crate::repositories::{Criterion, Query, StoreBackend, TenantStore};

/// Everything the tiers may consult for one context.
#[derive(Debug, Clone, Default)]
pub struct EntitlementFacts {
    pub is_master: bool,
    /// Features of the tenant's subscription, empty when none resolves.
    pub subscribed: Vec<String>,
    /// The acting user, if identified and found in the current tenant.
    pub user: Option<User>,
    pub roles: Vec<Role>,
    /// Groups listing the acting user as a member.
    pub groups: Vec<UserGroup>,
}

pub type Tier = fn(&EntitlementFacts, &str) -> Option<bool>;

fn grant(found: bool) -> Option<bool> {
    found.then_some(true)
}

pub fn master_tier(facts: &EntitlementFacts, _feature: &str) -> Option<bool> {
    grant(facts.is_master)
}

pub fn subscription_tier(facts: &EntitlementFacts, feature: &str) -> Option<bool> {
    grant(facts.subscribed.iter().any(|f| f == feature))
}

pub fn role_tier(facts: &EntitlementFacts, feature: &str) -> Option<bool> {
    grant(facts.roles.iter().any(|role| role.features.contains(feature)))
}

pub fn user_tier(facts: &EntitlementFacts, feature: &str) -> Option<bool> {
    grant(facts.user.as_ref().is_some_and(|user| user.features.contains(feature)))
}

pub fn group_tier(facts: &EntitlementFacts, feature: &str) -> Option<bool> {
    grant(facts.groups.iter().any(|group| group.features.contains(feature)))
}

/// Evaluation order. Role, user and group tiers only see data when a user was found.
pub const TIERS: [(&str, Tier); 5] = [
    ("master", master_tier),
    ("subscription", subscription_tier),
    ("role", role_tier),
    ("user", user_tier),
    ("group", group_tier),
];

pub fn resolve(facts: &EntitlementFacts, feature: &str) -> bool {
    for (name, tier) in TIERS {
        if let Some(decision) = tier(facts, feature) {
            debug!("Feature {} decided by {} tier: {}", feature, name, decision);
            return decision;
        }
    }
    false
}

/// Store-backed entitlement queries for a request context.
#[derive(Clone)]
pub struct FeatureService {
    backend: Arc<dyn StoreBackend>,
}

impl FeatureService {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    fn store(&self, ctx: &RequestContext) -> TenantStore {
        TenantStore::new(self.backend.clone(), ctx.tenant())
    }

    pub async fn has_feature(&self, ctx: &RequestContext, feature: &str) -> Result<bool, DomainError> {
        if ctx.is_master() {
            return Ok(true);
        }
        let facts = self.facts(ctx).await?;
        Ok(resolve(&facts, feature))
    }

    /// Flat feature list of the tenant's subscription.
    pub async fn subscribed_features(&self, ctx: &RequestContext) -> Result<Vec<String>, DomainError> {
        let store = self.store(ctx);

        let tenant = match store.unowned::<Tenant>().get(ctx.tenant_id()).await? {
            Some(tenant) => tenant,
            None => return Ok(Vec::new()),
        };
        let subscription_id = match tenant.subscription_id {
            Some(id) => id,
            None => return Ok(Vec::new()),
        };

        Ok(store
            .unowned::<Subscription>()
            .get(subscription_id)
            .await?
            .map(|subscription| subscription.features.to_vec())
            .unwrap_or_default())
    }

    pub async fn is_feature_subscribed(&self, ctx: &RequestContext, feature: &str) -> Result<bool, DomainError> {
        if ctx.is_master() {
            return Ok(true);
        }
        Ok(self.subscribed_features(ctx).await?.iter().any(|f| f == feature))
    }

    /// Gate for adding a feature grant to a role, user or group.
    pub async fn ensure_subscribed(&self, ctx: &RequestContext, feature: &str) -> Result<(), DomainError> {
        if self.is_feature_subscribed(ctx, feature).await? {
            Ok(())
        } else {
            Err(DomainError::FeatureNotSubscribed(feature.to_string()))
        }
    }

    pub async fn facts(&self, ctx: &RequestContext) -> Result<EntitlementFacts, DomainError> {
        let mut facts = EntitlementFacts {
            is_master: ctx.is_master(),
            subscribed: self.subscribed_features(ctx).await?,
            ..Default::default()
        };

        let subject = match ctx.subject() {
            Some(subject) => subject,
            None => return Ok(facts),
        };

        let store = self.store(ctx);
        let user_query = Query::all()
            .with(Criterion::TenantIs(ctx.tenant_id()))
            .field_eq("identity_provider_id", subject);
        let user = match store.owned::<User>().first(&user_query).await? {
            Some(user) => user,
            None => return Ok(facts),
        };

        if !user.role_ids.is_empty() {
            let role_query = Query::all()
                .with(Criterion::TenantIs(ctx.tenant_id()))
                .with(Criterion::IdIn(user.role_ids.clone()));
            facts.roles = store.owned::<Role>().find(&role_query).await?;
        }

        let group_query = Query::all()
            .with(Criterion::TenantIs(ctx.tenant_id()))
            .field_contains("user_ids", user.id.to_string());
        facts.groups = store.owned::<UserGroup>().find(&group_query).await?;
        facts.user = Some(user);

        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureSet;

    fn user_with(features: &[&str]) -> User {
        let mut user = User::new("u@x.com".into(), String::new(), String::new(), "idp|1".into()).unwrap();
        user.features = features.iter().collect();
        user
    }

    #[test]
    fn master_has_every_feature() {
        let facts = EntitlementFacts { is_master: true, ..Default::default() };
        assert!(resolve(&facts, "anything"));
    }

    #[test]
    fn no_facts_means_no_feature() {
        assert!(!resolve(&EntitlementFacts::default(), "anything"));
    }

    #[test]
    fn each_tier_can_grant() {
        let subscribed = EntitlementFacts { subscribed: vec!["Reports".into()], ..Default::default() };
        assert!(resolve(&subscribed, "Reports"));

        let mut role = Role::new("Analyst".into(), String::new()).unwrap();
        role.features = FeatureSet::from_iter(["Analytics"]);
        let by_role = EntitlementFacts { roles: vec![role], ..Default::default() };
        assert!(resolve(&by_role, "Analytics"));
        assert!(!resolve(&by_role, "Reports"));

        let by_user = EntitlementFacts { user: Some(user_with(&["Settings"])), ..Default::default() };
        assert!(resolve(&by_user, "Settings"));

        let mut group = UserGroup::new("Ops".into(), String::new()).unwrap();
        group.features = FeatureSet::from_iter(["Automation"]);
        let by_group = EntitlementFacts { groups: vec![group], ..Default::default() };
        assert!(resolve(&by_group, "Automation"));
    }

    #[test]
    fn tiers_run_in_order() {
        let names: Vec<&str> = TIERS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["master", "subscription", "role", "user", "group"]);
    }
}
