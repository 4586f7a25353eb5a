//! Entitlement cascade and feature-grant gating.

mod common;

use common::{acting, master, tenant, Harness};
use tenancy_core::error::DomainError;
use tenancy_core::services::{NewRole, NewUser, NewUserGroup};
use tenancy_shared::constants::features;

#[tokio::test]
async fn master_has_every_feature() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;

    assert!(h.services.features.has_feature(&master(a.id), "anything").await.unwrap());
    assert!(h.services.features.is_feature_subscribed(&master(a.id), "anything").await.unwrap());
}

#[tokio::test]
async fn nothing_granted_means_no_feature() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let ctx = tenant(a.id);

    h.services
        .users
        .create(&ctx, NewUser { email: "alice@alpha.io".into(), identity_provider_id: "idp|alice".into(), ..Default::default() })
        .await
        .unwrap();

    let alice = acting(a.id, "idp|alice");
    assert!(!h.services.features.has_feature(&alice, "anything").await.unwrap());
    assert!(h.services.features.subscribed_features(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn subscription_grants_features() {
    let h = Harness::new();
    let plan = h.subscription("Pro", &[features::DASHBOARD, features::REPORTS]).await;
    let a = h.tenant("Alpha", Some(plan.id)).await;
    let ctx = tenant(a.id);

    assert!(h.services.features.has_feature(&ctx, features::REPORTS).await.unwrap());
    assert!(!h.services.features.has_feature(&ctx, features::AUTOMATION).await.unwrap());
    assert_eq!(
        h.services.features.subscribed_features(&ctx).await.unwrap(),
        vec![features::DASHBOARD.to_string(), features::REPORTS.to_string()]
    );
}

#[tokio::test]
async fn granting_requires_subscription() {
    let h = Harness::new();
    let plan = h.subscription("Basic", &[features::DASHBOARD]).await;
    let a = h.tenant("Alpha", Some(plan.id)).await;
    let ctx = tenant(a.id);

    let user = h
        .services
        .users
        .create(&ctx, NewUser { email: "alice@alpha.io".into(), ..Default::default() })
        .await
        .unwrap();

    let granted = h.services.users.add_feature(&ctx, user.id, features::DASHBOARD).await.unwrap();
    assert!(granted.features.contains(features::DASHBOARD));

    let err = h.services.users.add_feature(&ctx, user.id, features::ANALYTICS).await.unwrap_err();
    assert!(matches!(err, DomainError::FeatureNotSubscribed(ref f) if f == features::ANALYTICS));

    let role = h.services.roles.create(&ctx, NewRole { title: "Viewer".into(), ..Default::default() }).await.unwrap();
    let err = h.services.roles.add_feature(&ctx, role.id, features::ANALYTICS).await.unwrap_err();
    assert!(matches!(err, DomainError::FeatureNotSubscribed(_)));

    // The master may grant anything.
    let by_master = h.services.users.add_feature(&master(a.id), user.id, features::ANALYTICS).await.unwrap();
    assert!(by_master.features.contains(features::ANALYTICS));
}

#[tokio::test]
async fn role_user_and_group_tiers_apply_to_the_acting_user() {
    let h = Harness::new();
    let plan = h
        .subscription("Enterprise", &[])
        .await;
    let a = h.tenant("Alpha", Some(plan.id)).await;
    let root = master(a.id);

    let user = h
        .services
        .users
        .create(&root, NewUser { email: "alice@alpha.io".into(), identity_provider_id: "idp|alice".into(), ..Default::default() })
        .await
        .unwrap();

    let role = h
        .services
        .roles
        .create(&root, NewRole { title: "Analyst".into(), features: vec![features::ANALYTICS.into()], ..Default::default() })
        .await
        .unwrap();
    h.services.users.assign_role(&root, user.id, role.id).await.unwrap();

    h.services.users.add_feature(&root, user.id, features::SETTINGS).await.unwrap();

    let group = h
        .services
        .groups
        .create(&root, NewUserGroup { name: "Ops".into(), features: vec![features::AUTOMATION.into()], ..Default::default() })
        .await
        .unwrap();
    h.services.groups.add_user(&root, group.id, user.id).await.unwrap();

    let alice = acting(a.id, "idp|alice");
    for feature in [features::ANALYTICS, features::SETTINGS, features::AUTOMATION] {
        assert!(h.services.features.has_feature(&alice, feature).await.unwrap(), "{}", feature);
    }
    assert!(!h.services.features.has_feature(&alice, features::SECURITY).await.unwrap());

    // Without an identified user only the subscription tier applies.
    assert!(!h.services.features.has_feature(&tenant(a.id), features::ANALYTICS).await.unwrap());

    // The same identity in another tenant resolves nothing.
    let b = h.tenant("Beta", None).await;
    assert!(!h.services.features.has_feature(&acting(b.id, "idp|alice"), features::ANALYTICS).await.unwrap());
}
