// ============================================================================
// Tenancy API - Router
// File: crates/tenancy-api/src/routes.rs
// ============================================================================

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{api_keys, features, groups, health, registrations, roles, subscriptions, tenants, users};
use crate::middleware::require_tenant_context;
use crate::state::AppState;

/// Every `/api/v1` route runs behind the tenant context middleware.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Tenants
        .route("/tenants", get(tenants::list).post(tenants::create))
        .route("/tenants/{id}", get(tenants::get).put(tenants::update).delete(tenants::delete))
        // Subscriptions
        .route("/subscriptions", get(subscriptions::list).post(subscriptions::create))
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get).put(subscriptions::update).delete(subscriptions::delete),
        )
        // Roles
        .route("/roles", get(roles::list).post(roles::create))
        .route("/roles/{id}", get(roles::get).put(roles::update).delete(roles::delete))
        .route("/roles/{id}/users/{user_id}", post(roles::add_user).delete(roles::remove_user))
        .route("/roles/{id}/features/{feature}", post(roles::add_feature).delete(roles::remove_feature))
        // Users
        .route("/users", get(users::list).post(users::create))
        .route("/users/login", post(users::sync_login))
        .route("/users/by-email/{email}", get(users::get_by_email).delete(users::delete_by_email))
        .route("/users/{id}", get(users::get).put(users::update).delete(users::delete))
        .route("/users/{id}/features/{feature}", post(users::add_feature).delete(users::remove_feature))
        .route("/users/{id}/roles/{role_id}", post(users::assign_role).delete(users::unassign_role))
        // Groups
        .route("/groups", get(groups::list).post(groups::create))
        .route("/groups/{id}", get(groups::get).put(groups::update).delete(groups::delete))
        .route("/groups/{id}/users/{user_id}", post(groups::add_user).delete(groups::remove_user))
        .route("/groups/{id}/features/{feature}", post(groups::add_feature).delete(groups::remove_feature))
        // API keys
        .route("/api-keys", get(api_keys::list).post(api_keys::create))
        .route("/api-keys/{id}", get(api_keys::get).put(api_keys::update).delete(api_keys::delete))
        .route("/api-keys/{id}/activate", post(api_keys::activate))
        .route("/api-keys/{id}/deactivate", post(api_keys::deactivate))
        // Entitlements
        .route("/features", get(features::subscribed))
        .route("/features/{name}", get(features::check))
        // Onboarding
        .route("/registrations", post(registrations::register))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_tenant_context));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api)
        .with_state(state)
}
