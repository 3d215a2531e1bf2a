//! Telemetry metric names and sinks.
//!
//! Centralised metric names for mimir operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `method`: origin request method, "GET" or "HEAD"
//! - `status`: HTTP status code, or "error" for transport failures
//! - `route`: "direct" (bucket root), "cached", or "rejected" (no usable
//!   origin target)
//! - `size_marker`: the event's size marker, "0" on a miss and "1" on a hit
//!
//! An event's correlation hash is a per-path SHA-256 and would give the
//! hit/miss counters one series per object, so [`MetricsSink`] only logs it.

use async_trait::async_trait;
use tracing::debug;

use crate::Result;
use crate::traits::TelemetrySink;
use crate::types::{Classification, TelemetryEvent};

/// Total inbound requests answered by the router.
///
/// Labels: `route`, `status`.
pub const REQUESTS_TOTAL: &str = "mimir_requests_total";

/// Total requests issued to the origin.
///
/// Labels: `method`, `status`.
pub const ORIGIN_REQUESTS_TOTAL: &str = "mimir_origin_requests_total";

/// Origin round-trip duration in seconds (until headers are received).
///
/// Labels: `method`.
pub const ORIGIN_REQUEST_DURATION_SECONDS: &str = "mimir_origin_request_duration_seconds";

/// Total requests served from the object store after a `304`.
///
/// Labels: `size_marker`.
pub const CACHE_HITS_TOTAL: &str = "mimir_cache_hits_total";

/// Total requests with no stored entry.
///
/// Labels: `size_marker`.
pub const CACHE_MISSES_TOTAL: &str = "mimir_cache_misses_total";

/// Total entries written to the object store.
pub const STORE_WRITES_TOTAL: &str = "mimir_store_writes_total";

/// [`TelemetrySink`] that records events through the `metrics` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSink;

#[async_trait]
impl TelemetrySink for MetricsSink {
    async fn record(&self, event: TelemetryEvent) -> Result<()> {
        let name = match event.classification {
            Classification::CacheHit => CACHE_HITS_TOTAL,
            Classification::CacheMiss => CACHE_MISSES_TOTAL,
        };
        metrics::counter!(name, "size_marker" => event.size_marker.to_string()).increment(1);
        debug!(
            classification = event.classification.as_str(),
            size_marker = event.size_marker,
            correlation = %event.correlation_hex(),
            "telemetry event"
        );
        Ok(())
    }
}

/// [`TelemetrySink`] that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl TelemetrySink for NoopSink {
    async fn record(&self, _event: TelemetryEvent) -> Result<()> {
        Ok(())
    }
}
