//! # Tenancy Core
//!
//! Tenant isolation and entitlement engine: request context, ownership-aware store
//! access, the stamping guard, the entitlement resolver and the domain services.

pub mod context;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod error;

// Re-export domain entities
pub use context::{RequestContext, TenantContext};
pub use domain::*;
pub use error::DomainError;
