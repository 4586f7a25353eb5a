//! # Tenancy Infrastructure
//! 
//! Store adapters: PostgreSQL (sqlx) and in-memory.

pub mod database;
pub mod memory;
pub mod error;

use std::sync::Arc;

use tracing::info;

use tenancy_core::repositories::StoreBackend;
use tenancy_shared::config::{DatabaseSettings, StorageBackend};

pub use database::{create_pool, run_migrations, PgStore};
pub use error::InfrastructureError;
pub use memory::MemoryStore;

/// Builds the configured backend. Postgres is migrated before it is returned.
pub async fn connect_store(settings: &DatabaseSettings) -> Result<Arc<dyn StoreBackend>, InfrastructureError> {
    match settings.backend {
        StorageBackend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let pool = create_pool(settings).await?;
            run_migrations(&pool).await?;
            info!("Using PostgreSQL store");
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
