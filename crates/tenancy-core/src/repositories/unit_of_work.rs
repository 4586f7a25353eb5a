// ============================================================================
// Tenancy Core - Unit of Work
// File: crates/tenancy-core/src/repositories/unit_of_work.rs
// Description: Staged writes, stamped and committed atomically
// ============================================================================

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use super::filter::RowFilter;
use super::guard::{stamp_tenant, Stamp};
use super::query::Query;
use super::store::{Change, Row, StoreBackend};
use crate::context::TenantContext;
use crate::domain::{Entity, Owned, Unowned};
use crate::error::DomainError;

trait StagedWrite: Send {
    fn table(&self) -> &'static str;

    /// Existing row the write applies to, if any.
    fn target(&self) -> Option<Uuid>;

    /// Filter the target row is loaded under.
    fn filter(&self, owned: RowFilter) -> RowFilter;

    fn prepare(self: Box<Self>, ctx: TenantContext, stored: Option<Row>) -> Result<Change, DomainError>;
}

struct InsertOwned<E>(E);

impl<E: Owned> StagedWrite for InsertOwned<E> {
    fn table(&self) -> &'static str {
        E::TABLE
    }

    fn target(&self) -> Option<Uuid> {
        None
    }

    fn filter(&self, owned: RowFilter) -> RowFilter {
        owned
    }

    fn prepare(self: Box<Self>, ctx: TenantContext, _stored: Option<Row>) -> Result<Change, DomainError> {
        let mut entity = self.0;
        if let Stamp::Overwritten { claimed } = stamp_tenant(&mut entity, ctx) {
            warn!(
                "{} {} claimed tenant {}; stamped with {}",
                E::NAME,
                entity.id(),
                claimed,
                ctx.tenant_id()
            );
        }

        Ok(Change::Insert {
            table: E::TABLE,
            unique: E::UNIQUE,
            row: Row::encode(&entity)?,
        })
    }
}

struct InsertUnowned<E>(E);

impl<E: Unowned> StagedWrite for InsertUnowned<E> {
    fn table(&self) -> &'static str {
        E::TABLE
    }

    fn target(&self) -> Option<Uuid> {
        None
    }

    fn filter(&self, _owned: RowFilter) -> RowFilter {
        RowFilter::Exempt
    }

    fn prepare(self: Box<Self>, _ctx: TenantContext, _stored: Option<Row>) -> Result<Change, DomainError> {
        Ok(Change::Insert {
            table: E::TABLE,
            unique: E::UNIQUE,
            row: Row::encode(&self.0)?,
        })
    }
}

struct Update<E> {
    entity: E,
    exempt: bool,
}

impl<E: Entity> StagedWrite for Update<E> {
    fn table(&self) -> &'static str {
        E::TABLE
    }

    fn target(&self) -> Option<Uuid> {
        Some(self.entity.id())
    }

    fn filter(&self, owned: RowFilter) -> RowFilter {
        if self.exempt {
            RowFilter::Exempt
        } else {
            owned
        }
    }

    fn prepare(self: Box<Self>, _ctx: TenantContext, stored: Option<Row>) -> Result<Change, DomainError> {
        let stored = stored.ok_or_else(|| DomainError::not_found(E::NAME, self.entity.id()))?;
        let mut row = Row::encode(&self.entity)?;
        row.keep_immutable_from(&stored);

        Ok(Change::Update {
            table: E::TABLE,
            unique: E::UNIQUE,
            row,
        })
    }
}

struct Delete<E> {
    id: Uuid,
    exempt: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> StagedWrite for Delete<E> {
    fn table(&self) -> &'static str {
        E::TABLE
    }

    fn target(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn filter(&self, owned: RowFilter) -> RowFilter {
        if self.exempt {
            RowFilter::Exempt
        } else {
            owned
        }
    }

    fn prepare(self: Box<Self>, _ctx: TenantContext, stored: Option<Row>) -> Result<Change, DomainError> {
        if stored.is_none() {
            return Err(DomainError::not_found(E::NAME, self.id));
        }
        Ok(Change::Delete { table: E::TABLE, id: self.id })
    }
}

/// Writes of one request, applied together or not at all.
///
/// Updates and deletes resolve their target under the same visibility filter as reads,
/// so a row owned by another tenant is `NotFound`. Inserts pass through the stamping guard.
pub struct UnitOfWork {
    backend: Arc<dyn StoreBackend>,
    ctx: TenantContext,
    filter: RowFilter,
    staged: Vec<Box<dyn StagedWrite>>,
}

impl UnitOfWork {
    pub(crate) fn new(backend: Arc<dyn StoreBackend>, ctx: TenantContext, filter: RowFilter) -> Self {
        Self { backend, ctx, filter, staged: Vec::new() }
    }

    pub fn insert<E: Owned>(&mut self, entity: E) -> &mut Self {
        self.staged.push(Box::new(InsertOwned(entity)));
        self
    }

    pub fn update<E: Owned>(&mut self, entity: E) -> &mut Self {
        self.staged.push(Box::new(Update { entity, exempt: false }));
        self
    }

    pub fn delete<E: Owned>(&mut self, id: Uuid) -> &mut Self {
        self.staged.push(Box::new(Delete::<E> { id, exempt: false, _entity: PhantomData }));
        self
    }

    pub fn insert_unowned<E: Unowned>(&mut self, entity: E) -> &mut Self {
        self.staged.push(Box::new(InsertUnowned(entity)));
        self
    }

    pub fn update_unowned<E: Unowned>(&mut self, entity: E) -> &mut Self {
        self.staged.push(Box::new(Update { entity, exempt: true }));
        self
    }

    pub fn delete_unowned<E: Unowned>(&mut self, id: Uuid) -> &mut Self {
        self.staged.push(Box::new(Delete::<E> { id, exempt: true, _entity: PhantomData }));
        self
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Stamps, then persists every staged write in one backend transaction.
    pub async fn commit(self) -> Result<(), DomainError> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut changes = Vec::with_capacity(self.staged.len());
        for write in self.staged {
            let stored = match write.target() {
                Some(id) => {
                    let filter = write.filter(self.filter);
                    let rows = self.backend.select(write.table(), &filter, &Query::by_id(id)).await?;
                    rows.into_iter().next()
                }
                None => None,
            };
            changes.push(write.prepare(self.ctx, stored)?);
        }

        debug!("Committing {} change(s) for tenant {}", changes.len(), self.ctx.tenant_id());
        self.backend.commit(changes).await
    }
}
