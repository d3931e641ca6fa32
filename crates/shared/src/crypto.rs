//! Hashing helpers for values that must not be stored in plain form.
//!
//! Session rows store only the SHA-256 of each token's `jti`.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a lowercase hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
