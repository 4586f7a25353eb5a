//! PostgreSQL store implementation

pub mod store_impl;

pub use store_impl::PgStore;
