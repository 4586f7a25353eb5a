//! Registration and bootstrap seeding.

mod common;

use common::{acting, tenant, Harness};
use tenancy_core::domain::{Role, User};
use tenancy_core::error::DomainError;
use tenancy_core::services::bootstrap::{self, BootstrapOutcome};
use tenancy_core::services::{PresentedCredentials, Registration};
use tenancy_shared::config::AuthSettings;
use tenancy_shared::constants::TENANT_ADMIN_ROLE;
use tenancy_shared::types::Pagination;

fn registration() -> Registration {
    Registration {
        tenant_name: "Gamma".into(),
        company_name: "Gamma Industries".into(),
        admin_email: "owner@gamma.io".into(),
        admin_first_name: "Grace".into(),
        admin_last_name: "Hopper".into(),
        admin_identity_provider_id: "idp|grace".into(),
        key_label: Some("bootstrap".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn registration_creates_a_working_tenant() {
    let h = Harness::new();
    let outcome = h.services.registrations.register(&h.master(), registration()).await.unwrap();

    let ctx = h
        .services
        .resolver
        .resolve(&PresentedCredentials {
            api_key: Some(outcome.api_key.clone()),
            tenant_id: Some(outcome.tenant_id.to_string()),
            identity_provider_id: Some("idp|grace".into()),
        })
        .await
        .unwrap();
    assert_eq!(ctx.tenant_id(), outcome.tenant_id);

    let users = h.services.users.list(&ctx, &Pagination::default()).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role_ids, vec![outcome.admin_role_id]);

    let role = h.services.roles.get(&ctx, outcome.admin_role_id).await.unwrap();
    assert_eq!(role.title, TENANT_ADMIN_ROLE);
    assert_eq!(role.user_ids, vec![outcome.admin_user_id]);

    let facts = h.services.features.facts(&acting(outcome.tenant_id, "idp|grace")).await.unwrap();
    assert_eq!(facts.roles.len(), 1);
}

#[tokio::test]
async fn registration_is_master_only() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;

    let err = h.services.registrations.register(&tenant(a.id), registration()).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn bootstrap_is_idempotent() {
    let h = Harness::new();
    let auth = common::auth(h.master_tenant);

    let first = bootstrap::seed(h.backend.clone(), &auth).await.unwrap();
    assert_eq!(first, BootstrapOutcome::Seeded { changes: 3 });

    let second = bootstrap::seed(h.backend.clone(), &auth).await.unwrap();
    assert_eq!(second, BootstrapOutcome::Unchanged);

    assert_eq!(h.store.count(<User as tenancy_core::Entity>::TABLE).await, 1);
    assert_eq!(h.store.count(<Role as tenancy_core::Entity>::TABLE).await, 1);

    let admin = h.services.users.get_by_email(&h.master(), "root@example.com").await.unwrap();
    assert_eq!(admin.tenant_id, h.master_tenant);
    assert_eq!(admin.role_ids.len(), 1);
}

#[tokio::test]
async fn bootstrap_requires_master_tenant_when_admin_is_configured() {
    let h = Harness::new();

    let skipped = AuthSettings { master_api_key: String::new(), master_tenant_id: None, admin_email: None };
    assert_eq!(bootstrap::seed(h.backend.clone(), &skipped).await.unwrap(), BootstrapOutcome::Skipped);

    let broken = AuthSettings { admin_email: Some("root@example.com".into()), ..skipped };
    let err = bootstrap::seed(h.backend.clone(), &broken).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationError(_)));
}
