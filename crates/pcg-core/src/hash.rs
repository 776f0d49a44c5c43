//! Content hashing over canonical JSON.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::PcgError;
use crate::serde::to_canonical_json_bytes;

/// Returns the hex encoded SHA-256 digest of the canonical JSON form of `value`.
pub fn stable_hash_string<T: Serialize + ?Sized>(value: &T) -> Result<String, PcgError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(hash_bytes(&bytes))
}

/// Returns the hex encoded SHA-256 digest of raw bytes.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
