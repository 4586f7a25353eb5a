//! Ownership traits.
//!
//! Every persisted type implements [`Entity`]. Types owned by a tenant additionally
//! implement [`Owned`]; the row visibility filter and the stamping guard are applied to
//! exactly those types. [`Unowned`] marks the exempt types (the tenant itself and the
//! shared subscription catalogue). A type implements one of the two, never both.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Storage table (or collection) name.
    const TABLE: &'static str;
    /// Name used in not-found errors.
    const NAME: &'static str;
    /// Body fields that must be unique across the whole table.
    const UNIQUE: &'static [&'static str] = &[];

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    /// Value of the row's tenant column, `None` when the type has no owner.
    fn owner(&self) -> Option<Uuid>;
}

/// A tenant-owned entity: reads are filtered on it and inserts are stamped.
pub trait Owned: Entity {
    fn tenant_id(&self) -> Uuid;
    fn set_tenant_id(&mut self, tenant_id: Uuid);

    /// An entity with the nil tenant id has not been assigned yet.
    fn has_explicit_tenant(&self) -> bool {
        !self.tenant_id().is_nil()
    }
}

/// Exempt from row filtering; access is gated at the service boundary instead.
pub trait Unowned: Entity {}
