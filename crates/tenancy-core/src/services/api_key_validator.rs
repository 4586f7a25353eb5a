// ============================================================================
// Tenancy Core - API Key Validator
// File: crates/tenancy-core/src/services/api_key_validator.rs
// Description: Classifies a presented secret as master, tenant key or invalid
// ============================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use tenancy_security::secrets_match;
use tenancy_shared::config::AuthSettings;
use tenancy_shared::utils::{mask_secret, parse_tenant_id};

use crate::domain::ApiKey;
use crate::error::DomainError;
use crate::repositories::{Bypass, Criterion, Privileged, Query, StoreBackend};

/// Outcome of validating one presented credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// The master secret. `tenant_id` is the tenant the master acts as.
    Master { tenant_id: Uuid },
    /// A valid dynamic key of `tenant_id`.
    Tenant { tenant_id: Uuid, key_label: String },
    Invalid,
}

pub struct ApiKeyValidator {
    backend: Arc<dyn StoreBackend>,
    master_key: Option<String>,
    master_tenant_id: Option<Uuid>,
}

impl ApiKeyValidator {
    pub fn new(backend: Arc<dyn StoreBackend>, auth: &AuthSettings) -> Self {
        if !auth.master_enabled() {
            info!("Master API key not configured; master authentication disabled");
        }

        Self {
            backend,
            master_key: auth.master_enabled().then(|| auth.master_api_key.clone()),
            master_tenant_id: auth.master_tenant_id,
        }
    }

    pub async fn validate(
        &self,
        presented: Option<&str>,
        claimed_tenant: Option<&str>,
    ) -> Result<Credential, DomainError> {
        self.validate_at(presented, claimed_tenant, Utc::now()).await
    }

    /// Read-only: never writes, and the only unfiltered read is the key lookup.
    pub async fn validate_at(
        &self,
        presented: Option<&str>,
        claimed_tenant: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Credential, DomainError> {
        let presented = match presented.map(str::trim).filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("Authentication rejected: no API key presented");
                return Ok(Credential::Invalid);
            }
        };

        let claimed = match claimed_tenant.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => match parse_tenant_id(raw) {
                Some(id) => Some(id),
                None => {
                    warn!("Authentication rejected: malformed tenant id {:?}", raw);
                    return Ok(Credential::Invalid);
                }
            },
            None => None,
        };

        if let Some(master_key) = &self.master_key {
            if secrets_match(presented, master_key) {
                return Ok(match claimed.or(self.master_tenant_id) {
                    Some(tenant_id) => Credential::Master { tenant_id },
                    None => {
                        warn!("Authentication rejected: master key without tenant id and no master tenant configured");
                        Credential::Invalid
                    }
                });
            }
        }

        let tenant_id = match claimed {
            Some(id) => id,
            None => {
                warn!("Authentication rejected: tenant key {} without tenant id", mask_secret(presented));
                return Ok(Credential::Invalid);
            }
        };

        let store = Privileged::new(self.backend.clone(), Bypass::ApiKeyAuthentication);
        let query = Query::all()
            .with(Criterion::TenantIs(tenant_id))
            .field_eq("key", presented);

        let key = match store.owned::<ApiKey>().first(&query).await? {
            Some(key) => key,
            None => {
                warn!(
                    "Authentication rejected: no key {} for tenant {}",
                    mask_secret(presented),
                    tenant_id
                );
                return Ok(Credential::Invalid);
            }
        };

        if !key.is_active {
            warn!("Authentication rejected: key '{}' of tenant {} is inactive", key.label, tenant_id);
            return Ok(Credential::Invalid);
        }
        if key.is_expired_at(now) {
            warn!("Authentication rejected: key '{}' of tenant {} is expired", key.label, tenant_id);
            return Ok(Credential::Invalid);
        }

        Ok(Credential::Tenant { tenant_id, key_label: key.label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockStoreBackend, Row, RowFilter};
    use chrono::Duration;
    use mockall::predicate::*;

    const MASTER: &str = "master-secret-value";

    fn auth(master_tenant_id: Option<Uuid>) -> AuthSettings {
        AuthSettings {
            master_api_key: MASTER.into(),
            master_tenant_id,
            admin_email: None,
        }
    }

    fn no_store() -> Arc<dyn StoreBackend> {
        let mut backend = MockStoreBackend::new();
        backend.expect_select().never();
        backend.expect_commit().never();
        Arc::new(backend)
    }

    fn store_with(key: Option<ApiKey>) -> Arc<dyn StoreBackend> {
        let rows: Vec<Row> = key.iter().map(|k| Row::encode(k).unwrap()).collect();
        let mut backend = MockStoreBackend::new();
        backend
            .expect_select()
            .with(
                eq("api_keys"),
                eq(RowFilter::Bypassed(Bypass::ApiKeyAuthentication)),
                always(),
            )
            .times(1)
            .returning(move |_, _, _| Ok(rows.clone()));
        backend.expect_commit().never();
        Arc::new(backend)
    }

    fn tenant_key(tenant_id: Uuid) -> ApiKey {
        let mut key = ApiKey::generate("ci".into(), None).unwrap();
        key.tenant_id = tenant_id;
        key
    }

    #[tokio::test]
    async fn master_acts_as_claimed_tenant() {
        let claimed = Uuid::new_v4();
        let validator = ApiKeyValidator::new(no_store(), &auth(Some(Uuid::new_v4())));
        let result = validator.validate(Some(MASTER), Some(&claimed.to_string())).await.unwrap();
        assert_eq!(result, Credential::Master { tenant_id: claimed });
    }

    #[tokio::test]
    async fn master_without_claim_uses_configured_tenant() {
        let master_tenant = Uuid::new_v4();
        let validator = ApiKeyValidator::new(no_store(), &auth(Some(master_tenant)));
        let result = validator.validate(Some(MASTER), None).await.unwrap();
        assert_eq!(result, Credential::Master { tenant_id: master_tenant });

        let validator = ApiKeyValidator::new(no_store(), &auth(None));
        assert_eq!(validator.validate(Some(MASTER), None).await.unwrap(), Credential::Invalid);
    }

    #[tokio::test]
    async fn empty_master_key_disables_master() {
        let settings = AuthSettings { master_api_key: String::new(), master_tenant_id: None, admin_email: None };
        let validator = ApiKeyValidator::new(store_with(None), &settings);
        let result = validator.validate(Some(MASTER), Some(&Uuid::new_v4().to_string())).await.unwrap();
        assert_eq!(result, Credential::Invalid);
    }

    #[tokio::test]
    async fn tenant_key_requires_claimed_tenant() {
        let validator = ApiKeyValidator::new(no_store(), &auth(Some(Uuid::new_v4())));
        let result = validator.validate(Some("tk_anything"), None).await.unwrap();
        assert_eq!(result, Credential::Invalid);
    }

    #[tokio::test]
    async fn malformed_tenant_is_invalid() {
        let validator = ApiKeyValidator::new(no_store(), &auth(None));
        assert_eq!(validator.validate(Some(MASTER), Some("acme")).await.unwrap(), Credential::Invalid);
    }

    #[tokio::test]
    async fn valid_tenant_key_authenticates() {
        let tenant = Uuid::new_v4();
        let key = tenant_key(tenant);
        let secret = key.key.clone();

        let validator = ApiKeyValidator::new(store_with(Some(key)), &auth(None));
        let result = validator.validate(Some(&secret), Some(&tenant.to_string())).await.unwrap();
        assert_eq!(result, Credential::Tenant { tenant_id: tenant, key_label: "ci".into() });
    }

    #[tokio::test]
    async fn inactive_or_expired_keys_never_authenticate() {
        let tenant = Uuid::new_v4();
        let now = Utc::now();

        let mut inactive = tenant_key(tenant);
        inactive.deactivate();
        let secret = inactive.key.clone();
        let validator = ApiKeyValidator::new(store_with(Some(inactive)), &auth(None));
        let result = validator.validate_at(Some(&secret), Some(&tenant.to_string()), now).await.unwrap();
        assert_eq!(result, Credential::Invalid);

        let mut expired = tenant_key(tenant);
        expired.expires_at = Some(now - Duration::minutes(1));
        let secret = expired.key.clone();
        let validator = ApiKeyValidator::new(store_with(Some(expired)), &auth(None));
        let result = validator.validate_at(Some(&secret), Some(&tenant.to_string()), now).await.unwrap();
        assert_eq!(result, Credential::Invalid);
    }

    #[tokio::test]
    async fn store_fault_is_propagated() {
        let mut backend = MockStoreBackend::new();
        backend
            .expect_select()
            .returning(|_, _, _| Err(DomainError::DatabaseError("connection reset".into())));
        let validator = ApiKeyValidator::new(Arc::new(backend), &auth(None));

        let result = validator.validate(Some("tk_x"), Some(&Uuid::new_v4().to_string())).await;
        assert!(matches!(result, Err(DomainError::DatabaseError(_))));
    }
}
