//! # Tenancy Security
//! 
//! Secret handling for API keys: generation and comparison.

pub mod secret;

pub use secret::{generate_api_key, secrets_match};
