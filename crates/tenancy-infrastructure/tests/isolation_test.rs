//! Row visibility and tenant stamping over the in-memory store.

mod common;

use uuid::Uuid;

use common::{master, tenant, Harness};
use tenancy_core::domain::User;
use tenancy_core::error::DomainError;
use tenancy_core::services::{NewRole, NewTenant, NewUser, RoleChanges};
use tenancy_shared::types::Pagination;

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        ..Default::default()
    }
}

fn emails(users: &[User]) -> Vec<&str> {
    users.iter().map(|u| u.email.as_str()).collect()
}

#[tokio::test]
async fn tenants_only_see_their_own_users() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let b = h.tenant("Beta", None).await;
    let page = Pagination::default();

    h.services.users.create(&tenant(a.id), new_user("alice@alpha.io")).await.unwrap();
    h.services.users.create(&tenant(b.id), new_user("bob@beta.io")).await.unwrap();

    let seen_by_a = h.services.users.list(&tenant(a.id), &page).await.unwrap();
    assert_eq!(emails(&seen_by_a), ["alice@alpha.io"]);

    let seen_by_b = h.services.users.list(&tenant(b.id), &page).await.unwrap();
    assert_eq!(emails(&seen_by_b), ["bob@beta.io"]);

    for acting_as in [a.id, b.id] {
        let seen_by_master = h.services.users.list(&master(acting_as), &page).await.unwrap();
        assert_eq!(seen_by_master.len(), 2);
    }
}

#[tokio::test]
async fn cross_tenant_access_is_not_found() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let b = h.tenant("Beta", None).await;

    let role = h
        .services
        .roles
        .create(&tenant(b.id), NewRole { title: "Editor".into(), ..Default::default() })
        .await
        .unwrap();

    let err = h.services.roles.get(&tenant(a.id), role.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = h
        .services
        .roles
        .update(&tenant(a.id), role.id, RoleChanges { title: Some("Owned".into()), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = h.services.roles.delete(&tenant(a.id), role.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let untouched = h.services.roles.get(&tenant(b.id), role.id).await.unwrap();
    assert_eq!(untouched.title, "Editor");
}

#[tokio::test]
async fn tenant_cannot_spoof_ownership() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let b = h.tenant("Beta", None).await;

    let role = h
        .services
        .roles
        .create(
            &tenant(a.id),
            NewRole { title: "Sneaky".into(), tenant_id: Some(b.id), ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(role.tenant_id, a.id);

    let user = h
        .services
        .users
        .create(&tenant(a.id), NewUser { tenant_id: Some(b.id), ..new_user("mallory@alpha.io") })
        .await
        .unwrap();
    assert_eq!(user.tenant_id, a.id);

    let seen_by_b = h.services.users.list(&tenant(b.id), &Pagination::default()).await.unwrap();
    assert!(seen_by_b.is_empty());
}

#[tokio::test]
async fn master_may_create_for_a_named_tenant() {
    let h = Harness::new();
    let x = h.tenant("Xeno", None).await;

    let role = h
        .services
        .roles
        .create(&h.master(), NewRole { title: "Auditor".into(), tenant_id: Some(x.id), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(role.tenant_id, x.id);

    let acting = h
        .services
        .roles
        .create(&master(x.id), NewRole { title: "Viewer".into(), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(acting.tenant_id, x.id);
}

#[tokio::test]
async fn updates_never_move_a_row() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let b = h.tenant("Beta", None).await;

    let role = h
        .services
        .roles
        .create(&tenant(a.id), NewRole { title: "Editor".into(), ..Default::default() })
        .await
        .unwrap();

    // Master updates through the other tenant's context; ownership stays with A.
    let updated = h
        .services
        .roles
        .update(&master(b.id), role.id, RoleChanges { title: Some("Chief Editor".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.tenant_id, a.id);

    let stored = h.services.roles.get(&tenant(a.id), role.id).await.unwrap();
    assert_eq!(stored.title, "Chief Editor");
    assert_eq!(stored.tenant_id, a.id);
    assert_eq!(stored.created_at, role.created_at);
}

#[tokio::test]
async fn email_uniqueness_is_per_tenant() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let b = h.tenant("Beta", None).await;

    h.services.users.create(&tenant(a.id), new_user("same@x.io")).await.unwrap();
    h.services.users.create(&tenant(b.id), new_user("same@x.io")).await.unwrap();

    let err = h.services.users.create(&tenant(a.id), new_user("Same@X.io")).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let err = h.services.users.get_by_email(&tenant(a.id), "nobody@x.io").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn tenant_management_is_master_only() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;

    let err = h.services.tenants.get(&tenant(a.id), a.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = h.services.tenants.list(&tenant(a.id), &Pagination::default()).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = h.services.tenants.delete(&tenant(a.id), a.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    // Deleting a tenant that does not exist is a no-op.
    h.services.tenants.delete(&h.master(), Uuid::new_v4()).await.unwrap();
    h.services.tenants.delete(&h.master(), a.id).await.unwrap();
    let err = h.services.tenants.get(&h.master(), a.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn tenant_id_must_not_be_nil() {
    let h = Harness::new();
    let input = NewTenant {
        id: Some(Uuid::nil()),
        tenant_name: "Nil".into(),
        company_name: "Nil Corp".into(),
        admin_email: "admin@nil.io".into(),
        ..Default::default()
    };

    let err = h.services.tenants.create(&h.master(), input).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationError(_)));
    assert!(h.services.tenants.list(&h.master(), &Pagination::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn email_lookup_misses_are_not_found() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;

    for email in ["aé@x.com", "ü@x.com", "日本語@x.com"] {
        let err = h.services.users.get_by_email(&tenant(a.id), email).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}

#[tokio::test]
async fn delete_by_email_stays_within_the_tenant() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let b = h.tenant("Beta", None).await;
    let page = Pagination::default();

    let role = h.services.roles.create(&tenant(a.id), NewRole { title: "Editor".into(), ..Default::default() }).await.unwrap();
    let alice = h.services.users.create(&tenant(a.id), new_user("alice@alpha.io")).await.unwrap();
    h.services.roles.add_user(&tenant(a.id), role.id, alice.id).await.unwrap();
    h.services.users.create(&tenant(b.id), new_user("alice@alpha.io")).await.unwrap();

    h.services.users.delete_by_email(&tenant(a.id), "Alice@Alpha.io").await.unwrap();

    assert!(h.services.users.list(&tenant(a.id), &page).await.unwrap().is_empty());
    assert!(h.services.roles.get(&tenant(a.id), role.id).await.unwrap().user_ids.is_empty());
    assert_eq!(h.services.users.list(&tenant(b.id), &page).await.unwrap().len(), 1);

    let err = h.services.users.delete_by_email(&tenant(a.id), "alice@alpha.io").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn role_membership_is_kept_in_sync() {
    let h = Harness::new();
    let a = h.tenant("Alpha", None).await;
    let b = h.tenant("Beta", None).await;
    let ctx = tenant(a.id);

    let role = h.services.roles.create(&ctx, NewRole { title: "Editor".into(), ..Default::default() }).await.unwrap();
    let user = h.services.users.create(&ctx, new_user("alice@alpha.io")).await.unwrap();

    h.services.roles.add_user(&ctx, role.id, user.id).await.unwrap();
    let user_after = h.services.users.get(&ctx, user.id).await.unwrap();
    assert_eq!(user_after.role_ids, vec![role.id]);

    h.services.users.unassign_role(&ctx, user.id, role.id).await.unwrap();
    let role_after = h.services.roles.get(&ctx, role.id).await.unwrap();
    assert!(role_after.user_ids.is_empty());

    // A user of another tenant is invisible, so it cannot be linked.
    let foreign = h.services.users.create(&tenant(b.id), new_user("bob@beta.io")).await.unwrap();
    let err = h.services.roles.add_user(&ctx, role.id, foreign.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
