//! Request path fingerprints for telemetry correlation.
//!
//! Fingerprints are never used as cache keys; the store is keyed by the
//! full [`RequestIdentity`](crate::types::RequestIdentity).

use sha2::{Digest, Sha256};

/// 32-byte SHA-256 digest.
pub type Fingerprint = [u8; 32];

/// Stable fingerprint of a request path.
pub fn fingerprint(path: &str) -> Fingerprint {
    Sha256::digest(path.as_bytes()).into()
}
