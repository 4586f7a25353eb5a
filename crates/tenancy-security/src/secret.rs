//! API key secrets

use rand::RngCore;
use sha2::{Digest, Sha256};
use tenancy_shared::constants::API_KEY_SECRET_BYTES;

const API_KEY_PREFIX: &str = "tk_";

/// Generates a new random API key secret, hex encoded with a `tk_` prefix.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; API_KEY_SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    format!("{}{}", API_KEY_PREFIX, hex::encode(bytes))
}

/// Compares two secrets in constant time with respect to their content.
///
/// Both sides are hashed first so the comparison length never depends on the input.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
