//! Cryptographic utilities for API key hashing.

use sha2::{Digest, Sha256};

/// Prefix every platform API key starts with.
pub const API_KEY_PREFIX: &str = "gk_";

/// Minimum number of characters following [`API_KEY_PREFIX`].
pub const API_KEY_MIN_BODY_LEN: usize = 8;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns `true` if the key has the platform prefix and a long enough body.
pub fn is_well_formed_api_key(key: &str) -> bool {
    key.starts_with(API_KEY_PREFIX) && key.len() >= API_KEY_PREFIX.len() + API_KEY_MIN_BODY_LEN
}
