//! Credential validation against stored keys.

mod common;

use chrono::{Duration, Utc};
use uuid::Uuid;

use common::{tenant, Harness, MASTER_KEY};
use tenancy_core::error::DomainError;
use tenancy_core::services::{ApiKeyChanges, Credential, NewApiKey, PresentedCredentials};

fn presented(key: &str, tenant_id: Option<Uuid>) -> PresentedCredentials {
    PresentedCredentials {
        api_key: Some(key.to_string()),
        tenant_id: tenant_id.map(|id| id.to_string()),
        identity_provider_id: None,
    }
}

#[tokio::test]
async fn tenant_key_resolves_to_its_tenant() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;

    let key = h
        .services
        .api_keys
        .create(&tenant(a.id), NewApiKey { label: "ci".into(), ..Default::default() })
        .await
        .unwrap();
    assert!(key.key.starts_with("tk_"));

    let ctx = h.services.resolver.resolve(&presented(&key.key, Some(a.id))).await.unwrap();
    assert_eq!(ctx.tenant_id(), a.id);
    assert!(!ctx.is_master());
    assert_eq!(ctx.key_label(), Some("ci"));
}

#[tokio::test]
async fn key_cannot_claim_another_tenant() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let b = h.tenant("Beta", None).await;

    let key = h
        .services
        .api_keys
        .create(&tenant(a.id), NewApiKey { label: "ci".into(), ..Default::default() })
        .await
        .unwrap();

    let err = h.services.resolver.resolve(&presented(&key.key, Some(b.id))).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated));

    let err = h.services.resolver.resolve(&presented(&key.key, None)).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated));
}

#[tokio::test]
async fn inactive_and_expired_keys_are_rejected() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let ctx = tenant(a.id);

    let key = h
        .services
        .api_keys
        .create(&ctx, NewApiKey { label: "ci".into(), ..Default::default() })
        .await
        .unwrap();

    h.services.api_keys.deactivate(&ctx, key.id).await.unwrap();
    let err = h.services.resolver.resolve(&presented(&key.key, Some(a.id))).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated));

    h.services.api_keys.activate(&ctx, key.id).await.unwrap();
    h.services
        .api_keys
        .update(
            &ctx,
            key.id,
            ApiKeyChanges { expires_at: Some(Some(Utc::now() - Duration::hours(1))), ..Default::default() },
        )
        .await
        .unwrap();
    let err = h.services.resolver.resolve(&presented(&key.key, Some(a.id))).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated));

    let valid = h
        .services
        .api_keys
        .create(
            &ctx,
            NewApiKey { label: "later".into(), expires_at: Some(Utc::now() + Duration::days(1)), ..Default::default() },
        )
        .await
        .unwrap();
    assert!(h.services.resolver.resolve(&presented(&valid.key, Some(a.id))).await.is_ok());
}

#[tokio::test]
async fn master_key_acts_as_named_tenant() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;

    let ctx = h.services.resolver.resolve(&presented(MASTER_KEY, Some(a.id))).await.unwrap();
    assert!(ctx.is_master());
    assert_eq!(ctx.tenant_id(), a.id);

    let ctx = h.services.resolver.resolve(&presented(MASTER_KEY, None)).await.unwrap();
    assert_eq!(ctx.tenant_id(), h.master_tenant);
}

#[tokio::test]
async fn key_secrets_are_unique_across_tenants() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let b = h.tenant("Beta", None).await;
    let secret = tenancy_security::generate_api_key();

    h.services
        .api_keys
        .create(&tenant(a.id), NewApiKey { key: Some(secret.clone()), label: "one".into(), ..Default::default() })
        .await
        .unwrap();

    let err = h
        .services
        .api_keys
        .create(&tenant(b.id), NewApiKey { key: Some(secret), label: "two".into(), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn validator_reports_credential_kind() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let key = h
        .services
        .api_keys
        .create(&tenant(a.id), NewApiKey { label: "ci".into(), ..Default::default() })
        .await
        .unwrap();

    let validator = tenancy_core::services::ApiKeyValidator::new(h.backend.clone(), &common::auth(h.master_tenant));
    let credential = validator.validate(Some(&key.key), Some(&a.id.to_string())).await.unwrap();
    assert_eq!(credential, Credential::Tenant { tenant_id: a.id, key_label: "ci".into() });
}
