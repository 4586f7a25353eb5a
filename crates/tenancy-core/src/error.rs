//! Domain errors

use thiserror::Error;

/// Public message for every authentication failure; the cause is only logged.
pub const UNAUTHENTICATED_MESSAGE: &str = "Missing or invalid credentials";

#[derive(Error, Debug)]
pub enum DomainError {
    /// Bad or missing key, missing tenant header, expired or inactive key.
    #[error("{}", UNAUTHENTICATED_MESSAGE)]
    Unauthenticated,

    /// The caller is known but lacks the privilege tier for the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing or owned by another tenant. The two are indistinguishable.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The tenant's plan or grants do not include the feature.
    #[error("Tenant is not subscribed to feature {0}")]
    FeatureNotSubscribed(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound { entity, id: id.to_string() }
    }

    /// Infrastructure faults are the only errors fatal to the request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, DomainError::DatabaseError(_) | DomainError::InternalError(_))
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(err: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::InternalError(format!("row codec: {}", err))
    }
}
