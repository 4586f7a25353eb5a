// ============================================================================
// Tenancy Infrastructure - In-Memory Store
// File: crates/tenancy-infrastructure/src/memory.rs
// Description: Process-local backend for tests and the `memory` setting
// ============================================================================

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use tenancy_core::error::DomainError;
use tenancy_core::repositories::{Change, Query, Row, RowFilter, StoreBackend};

type Tables = HashMap<&'static str, BTreeMap<Uuid, Row>>;

/// Tables of rows behind one lock. A commit is applied to a copy and swapped in
/// only when every change succeeded.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in `table`, regardless of owner.
    pub async fn count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, BTreeMap::len)
    }
}

fn check_unique(rows: &BTreeMap<Uuid, Row>, unique: &[&str], row: &Row) -> Result<(), DomainError> {
    for field in unique {
        let value = match row.field_text(field) {
            Some(value) => value,
            None => continue,
        };
        let taken = rows
            .values()
            .any(|other| other.id != row.id && other.field_text(field).as_deref() == Some(value.as_str()));
        if taken {
            warn!("Unique constraint violated on {}", field);
            return Err(DomainError::Conflict(format!("duplicate {}", field)));
        }
    }
    Ok(())
}

fn apply(tables: &mut Tables, change: Change) -> Result<(), DomainError> {
    match change {
        Change::Insert { table, unique, row } => {
            let rows = tables.entry(table).or_default();
            if rows.contains_key(&row.id) {
                return Err(DomainError::Conflict(format!("{} {}", table, row.id)));
            }
            check_unique(rows, unique, &row)?;
            rows.insert(row.id, row);
        }
        Change::Update { table, unique, mut row } => {
            let rows = tables.entry(table).or_default();
            let stored = rows
                .get(&row.id)
                .ok_or_else(|| DomainError::not_found("Row", row.id))?;
            row.tenant_id = stored.tenant_id;
            row.created_at = stored.created_at;
            check_unique(rows, unique, &row)?;
            rows.insert(row.id, row);
        }
        Change::Delete { table, id } => {
            if let Some(rows) = tables.get_mut(table) {
                rows.remove(&id);
            }
        }
    }
    Ok(())
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn select(
        &self,
        table: &'static str,
        filter: &RowFilter,
        query: &Query,
    ) -> Result<Vec<Row>, DomainError> {
        if let RowFilter::Bypassed(reason) = filter {
            debug!("Unfiltered select on {} ({})", table, reason.as_str());
        }

        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = match tables.get(table) {
            Some(rows) => rows
                .values()
                .filter(|row| filter.admits(row.tenant_id) && query.matches(row))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn commit(&self, changes: Vec<Change>) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let mut next = tables.clone();
        for change in changes {
            apply(&mut next, change)?;
        }
        *tables = next;
        Ok(())
    }
}
