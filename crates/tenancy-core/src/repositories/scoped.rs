// ============================================================================
// Tenancy Core - Scoped Store Access
// File: crates/tenancy-core/src/repositories/scoped.rs
// Description: Filtered tables bound to a request's tenant context
// ============================================================================

use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;

use super::filter::{Bypass, RowFilter};
use super::query::Query;
use super::store::StoreBackend;
use super::unit_of_work::UnitOfWork;
use crate::context::TenantContext;
use crate::domain::{Entity, Owned, Unowned};
use crate::error::DomainError;

/// Store access for one request. Every owned table it hands out is filtered
/// to the context's tenant unless the context is master.
#[derive(Clone)]
pub struct TenantStore {
    backend: Arc<dyn StoreBackend>,
    ctx: TenantContext,
}

impl TenantStore {
    pub fn new(backend: Arc<dyn StoreBackend>, ctx: TenantContext) -> Self {
        Self { backend, ctx }
    }

    pub fn context(&self) -> TenantContext {
        self.ctx
    }

    pub fn owned<E: Owned>(&self) -> Table<'_, E> {
        Table::new(self.backend.as_ref(), RowFilter::for_context(self.ctx))
    }

    pub fn unowned<E: Unowned>(&self) -> Table<'_, E> {
        Table::new(self.backend.as_ref(), RowFilter::Exempt)
    }

    pub fn begin(&self) -> UnitOfWork {
        UnitOfWork::new(self.backend.clone(), self.ctx, RowFilter::for_context(self.ctx))
    }
}

/// Unfiltered access for one of the named internal operations.
pub struct Privileged {
    backend: Arc<dyn StoreBackend>,
    reason: Bypass,
}

impl Privileged {
    pub fn new(backend: Arc<dyn StoreBackend>, reason: Bypass) -> Self {
        Self { backend, reason }
    }

    pub fn owned<E: Owned>(&self) -> Table<'_, E> {
        Table::new(self.backend.as_ref(), RowFilter::bypassed(self.reason))
    }

    pub fn unowned<E: Unowned>(&self) -> Table<'_, E> {
        Table::new(self.backend.as_ref(), RowFilter::Exempt)
    }

    /// Writes stamped as `ctx`, loading existing rows without the filter.
    pub fn begin(&self, ctx: TenantContext) -> UnitOfWork {
        UnitOfWork::new(self.backend.clone(), ctx, RowFilter::bypassed(self.reason))
    }
}

/// Typed read access to one table under a fixed filter.
pub struct Table<'a, E> {
    backend: &'a dyn StoreBackend,
    filter: RowFilter,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> Table<'a, E> {
    fn new(backend: &'a dyn StoreBackend, filter: RowFilter) -> Self {
        Self { backend, filter, _entity: PhantomData }
    }

    pub fn filter(&self) -> RowFilter {
        self.filter
    }

    pub async fn find(&self, query: &Query) -> Result<Vec<E>, DomainError> {
        let rows = self.backend.select(E::TABLE, &self.filter, query).await?;
        rows.iter().map(|row| row.decode::<E>()).collect()
    }

    pub async fn list(&self) -> Result<Vec<E>, DomainError> {
        self.find(&Query::all()).await
    }

    pub async fn first(&self, query: &Query) -> Result<Option<E>, DomainError> {
        Ok(self.find(query).await?.into_iter().next())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<E>, DomainError> {
        self.first(&Query::by_id(id)).await
    }

    /// Like [`Table::get`], but a missing or invisible row is `NotFound`.
    pub async fn require(&self, id: Uuid) -> Result<E, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(E::NAME, id))
    }
}
