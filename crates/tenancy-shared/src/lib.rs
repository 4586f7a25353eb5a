//! # Tenancy Shared
//! 
//! Shared configuration, telemetry, constants, and common types for the tenancy workspace.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
