//! Hashing utilities for generated identifiers.

use sha2::{Digest, Sha256};

/// Compute SHA256 hash of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute SHA256 hash of a string.
pub fn sha256_str(s: &str) -> String {
    sha256_bytes(s.as_bytes())
}

/// Derive a stable GUID (`{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}`) from a name.
///
/// The same name always yields the same GUID, so regenerating a project
/// does not make the IDE treat it as a new one.
pub fn guid_from_name(name: &str) -> String {
    let digest = sha256_str(name).to_uppercase();
    format!(
        "{{{}-{}-{}-{}-{}}}",
        &digest[0..8],
        &digest[8..12],
        &digest[12..16],
        &digest[16..20],
        &digest[20..32]
    )
}
