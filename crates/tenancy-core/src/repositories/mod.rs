//! Store access (ports)
//!
//! Services never talk to a [`StoreBackend`] directly. Reads go through a [`TenantStore`]
//! table, which attaches the row visibility filter for the entity type, and writes go
//! through a [`UnitOfWork`], which runs the stamping guard right before commit.

pub mod store;
pub mod query;
pub mod filter;
pub mod guard;
pub mod scoped;
pub mod unit_of_work;

pub use store::{Change, Row, StoreBackend};
pub use query::{Criterion, Query};
pub use filter::{Bypass, RowFilter};
pub use guard::{stamp_tenant, Stamp};
pub use scoped::{Privileged, Table, TenantStore};
pub use unit_of_work::UnitOfWork;

#[cfg(test)]
pub use store::MockStoreBackend;
