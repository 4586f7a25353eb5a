//! # Tenancy API
//! 
//! HTTP handlers, the tenant context middleware, DTOs, and responses.

pub mod handlers;
pub mod middleware;
pub mod extract;
pub mod dto;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
