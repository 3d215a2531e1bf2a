//! Telemetry events.

use serde::Serialize;

use crate::fingerprint::{Fingerprint, fingerprint};

/// Hit/miss classification of a resolved request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    CacheHit,
    CacheMiss,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::CacheHit => "cache-hit",
            Classification::CacheMiss => "cache-miss",
        }
    }
}

/// One telemetry data point, emitted at most once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryEvent {
    pub classification: Classification,
    /// `1` when served from the store, `0` on a miss.
    pub size_marker: u8,
    /// SHA-256 of the request path.
    pub correlation_hash: Fingerprint,
}

impl TelemetryEvent {
    /// A cache hit for `path`.
    pub fn hit(path: &str) -> Self {
        Self {
            classification: Classification::CacheHit,
            size_marker: 1,
            correlation_hash: fingerprint(path),
        }
    }

    /// A cache miss for `path`.
    pub fn miss(path: &str) -> Self {
        Self {
            classification: Classification::CacheMiss,
            size_marker: 0,
            correlation_hash: fingerprint(path),
        }
    }

    /// Lowercase hex form of the correlation hash.
    pub fn correlation_hex(&self) -> String {
        hex::encode(self.correlation_hash)
    }
}
