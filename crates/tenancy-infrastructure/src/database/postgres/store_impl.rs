// ============================================================================
// Tenancy Infrastructure - PostgreSQL Store
// File: crates/tenancy-infrastructure/src/database/postgres/store_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::JsonValue;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, error, warn};
use uuid::Uuid;

use tenancy_core::error::DomainError;
use tenancy_core::repositories::{Change, Criterion, Query, Row, RowFilter, StoreBackend};

/// Tables created by the migrations. Table names are never taken from input.
const TABLES: [&str; 6] = ["tenants", "subscriptions", "roles", "user_groups", "users", "api_keys"];

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct StoredRow {
    id: Uuid,
    tenant_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    body: JsonValue,
}

impl From<StoredRow> for Row {
    fn from(row: StoredRow) -> Self {
        Row {
            id: row.id,
            tenant_id: row.tenant_id,
            created_at: row.created_at,
            body: row.body,
        }
    }
}

fn known_table(table: &'static str) -> Result<&'static str, DomainError> {
    if TABLES.contains(&table) {
        Ok(table)
    } else {
        Err(DomainError::InternalError(format!("unknown table {}", table)))
    }
}

fn map_error(context: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            warn!("Unique constraint violated during {}: {}", context, db.message());
            return DomainError::Conflict(db.constraint().unwrap_or("unique constraint").to_string());
        }
    }
    error!("Database error during {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

/// Appends the visibility predicate and the query criteria as bound parameters.
fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, filter: &RowFilter, query: &Query) {
    builder.push(" WHERE TRUE");

    if let RowFilter::Owned { tenant_id, is_master } = filter {
        builder
            .push(" AND (")
            .push_bind(*is_master)
            .push(" OR tenant_id = ")
            .push_bind(*tenant_id)
            .push(")");
    }

    for criterion in query.criteria() {
        match criterion {
            Criterion::Id(id) => {
                builder.push(" AND id = ").push_bind(*id);
            }
            Criterion::IdIn(ids) => {
                builder.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
            }
            Criterion::TenantIs(tenant_id) => {
                builder.push(" AND tenant_id = ").push_bind(*tenant_id);
            }
            Criterion::FieldEq { field, value } => {
                builder
                    .push(" AND body->>")
                    .push_bind(*field)
                    .push(" = ")
                    .push_bind(value.clone());
            }
            Criterion::FieldContains { field, value } => {
                builder
                    .push(" AND jsonb_exists(body->")
                    .push_bind(*field)
                    .push(", ")
                    .push_bind(value.clone())
                    .push(")");
            }
        }
    }
}

#[async_trait]
impl StoreBackend for PgStore {
    async fn select(
        &self,
        table: &'static str,
        filter: &RowFilter,
        query: &Query,
    ) -> Result<Vec<Row>, DomainError> {
        let table = known_table(table)?;
        if let RowFilter::Bypassed(reason) = filter {
            debug!("Unfiltered select on {} ({})", table, reason.as_str());
        }

        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, tenant_id, created_at, body FROM ");
        builder.push(table);
        push_conditions(&mut builder, filter, query);
        builder.push(" ORDER BY created_at, id");

        let rows: Vec<StoredRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_error("select", e))?;

        Ok(rows.into_iter().map(Row::from).collect())
    }

    async fn commit(&self, changes: Vec<Change>) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| map_error("begin", e))?;

        for change in changes {
            let table = known_table(change.table())?;
            let result = match change {
                Change::Insert { row, .. } => {
                    let sql = format!(
                        "INSERT INTO {} (id, tenant_id, created_at, body) VALUES ($1, $2, $3, $4)",
                        table
                    );
                    sqlx::query(&sql)
                        .bind(row.id)
                        .bind(row.tenant_id)
                        .bind(row.created_at)
                        .bind(row.body)
                        .execute(&mut *tx)
                        .await
                }
                Change::Update { row, .. } => {
                    // tenant_id and created_at are write-once
                    let sql = format!("UPDATE {} SET body = $2 WHERE id = $1", table);
                    sqlx::query(&sql)
                        .bind(row.id)
                        .bind(row.body)
                        .execute(&mut *tx)
                        .await
                }
                Change::Delete { id, .. } => {
                    let sql = format!("DELETE FROM {} WHERE id = $1", table);
                    sqlx::query(&sql).bind(id).execute(&mut *tx).await
                }
            };
            // Dropping the transaction rolls it back.
            result.map_err(|e| map_error("commit", e))?;
        }

        tx.commit().await.map_err(|e| map_error("commit", e))
    }
}
