//! Backend-neutral query criteria

use serde_json::Value;
use uuid::Uuid;

use super::store::Row;

/// A single condition on a row. Field names are top-level body keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Id(Uuid),
    IdIn(Vec<Uuid>),
    /// Explicit owner match, independent of the visibility filter.
    TenantIs(Uuid),
    FieldEq { field: &'static str, value: String },
    /// The field is an array of strings containing `value`.
    FieldContains { field: &'static str, value: String },
}

impl Criterion {
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Criterion::Id(id) => row.id == *id,
            Criterion::IdIn(ids) => ids.contains(&row.id),
            Criterion::TenantIs(tenant_id) => row.tenant_id == Some(*tenant_id),
            Criterion::FieldEq { field, value } => row.field_text(field).as_deref() == Some(value.as_str()),
            Criterion::FieldContains { field, value } => match row.body.get(*field) {
                Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(value.as_str())),
                _ => false,
            },
        }
    }
}

/// Conjunction of criteria. An empty query matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    criteria: Vec<Criterion>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::all().with(Criterion::Id(id))
    }

    pub fn with(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn field_eq(self, field: &'static str, value: impl Into<String>) -> Self {
        self.with(Criterion::FieldEq { field, value: value.into() })
    }

    pub fn field_contains(self, field: &'static str, value: impl Into<String>) -> Self {
        self.with(Criterion::FieldContains { field, value: value.into() })
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(row))
    }
}
