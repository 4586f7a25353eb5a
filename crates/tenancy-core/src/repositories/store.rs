// ============================================================================
// Tenancy Core - Store Port
// File: crates/tenancy-core/src/repositories/store.rs
// Description: Backend contract implemented by the Postgres and memory adapters
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::filter::RowFilter;
use super::query::Query;
use crate::domain::Entity;
use crate::error::DomainError;

/// One stored entity. `tenant_id` and `created_at` are projections of the body
/// kept as columns so the backend can filter and order without decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub body: serde_json::Value,
}

impl Row {
    pub fn encode<E: Entity>(entity: &E) -> Result<Self, DomainError> {
        Ok(Self {
            id: entity.id(),
            tenant_id: entity.owner(),
            created_at: entity.created_at(),
            body: serde_json::to_value(entity)?,
        })
    }

    pub fn decode<E: Entity>(&self) -> Result<E, DomainError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Carries the write-once columns of `stored` over to this row.
    pub(crate) fn keep_immutable_from(&mut self, stored: &Row) {
        self.tenant_id = stored.tenant_id;
        self.created_at = stored.created_at;

        if let (Some(body), Some(old)) = (self.body.as_object_mut(), stored.body.as_object()) {
            for key in ["tenant_id", "created_at"] {
                if let Some(value) = old.get(key) {
                    body.insert(key.to_string(), value.clone());
                }
            }
        }
    }

    /// Text form of a top-level body field, as compared by unique constraints.
    pub fn field_text(&self, field: &str) -> Option<String> {
        match self.body.get(field)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A write staged by a unit of work, already stamped.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Insert {
        table: &'static str,
        unique: &'static [&'static str],
        row: Row,
    },
    Update {
        table: &'static str,
        unique: &'static [&'static str],
        row: Row,
    },
    Delete {
        table: &'static str,
        id: Uuid,
    },
}

impl Change {
    pub fn table(&self) -> &'static str {
        match self {
            Change::Insert { table, .. } | Change::Update { table, .. } | Change::Delete { table, .. } => *table,
        }
    }
}

/// Storage backend.
///
/// `select` must apply `filter` itself; `commit` applies every change or none.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn select(
        &self,
        table: &'static str,
        filter: &RowFilter,
        query: &Query,
    ) -> Result<Vec<Row>, DomainError>;

    async fn commit(&self, changes: Vec<Change>) -> Result<(), DomainError>;
}
