//! Ports between the revalidation engine and its collaborators.
//!
//! The engine only talks to the origin, the object store and the telemetry
//! sink through these traits, so each can be swapped (a different store
//! backend, a mock origin in tests) without touching the engine.
//!
//! # Failure semantics
//!
//! - [`OriginClient`]: any HTTP status is `Ok`; only transport failures are
//!   `Err`.
//! - [`ObjectStore`]: errors are backend failures, never "not found".
//! - [`TelemetrySink`]: errors are logged and discarded by the caller.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH};

use crate::Result;
use crate::types::{CachedEntry, ProxyResponse, RequestIdentity, TelemetryEvent, Validators};

// ============================================================================
// Origin
// ============================================================================

/// Methods the engine issues against the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMethod {
    Get,
    Head,
}

impl FetchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMethod::Get => "GET",
            FetchMethod::Head => "HEAD",
        }
    }
}

impl From<FetchMethod> for Method {
    fn from(method: FetchMethod) -> Self {
        match method {
            FetchMethod::Get => Method::GET,
            FetchMethod::Head => Method::HEAD,
        }
    }
}

/// Conditional request headers. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalHeaders {
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

impl ConditionalHeaders {
    /// Unconditional request.
    pub fn none() -> Self {
        Self::default()
    }

    /// Echo a cached entry's validators back to the origin.
    pub fn from_validators(validators: Validators) -> Self {
        Self {
            if_none_match: validators.etag,
            if_modified_since: validators.last_modified,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.if_none_match.is_none() && self.if_modified_since.is_none()
    }

    /// Header map holding only the validators that are present.
    ///
    /// Values that are not valid header values are skipped.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = self.if_none_match.as_deref().and_then(header_value) {
            headers.insert(IF_NONE_MATCH, value);
        }
        if let Some(value) = self.if_modified_since.as_deref().and_then(header_value) {
            headers.insert(IF_MODIFIED_SINCE, value);
        }
        headers
    }
}

fn header_value(value: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(value).ok()
}

/// Client for the upstream object-storage origin.
#[async_trait]
pub trait OriginClient: Send + Sync {
    /// Issue `method` against `identity`, sending the present conditional
    /// headers.
    ///
    /// Non-2xx statuses are returned as ordinary responses. Errors mean the
    /// origin could not be reached (DNS, refused connection, timeout).
    async fn fetch(
        &self,
        method: FetchMethod,
        identity: &RequestIdentity,
        conditional: &ConditionalHeaders,
    ) -> Result<ProxyResponse>;
}

// ============================================================================
// Object store
// ============================================================================

/// Key-value store of cached origin responses, keyed by request identity.
///
/// Implementations own capacity and eviction. They must return entries
/// exactly as stored (headers and bytes) and must not interpret the
/// entry's `cache-control`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Look up the entry for `identity`. `Ok(None)` on a miss.
    async fn lookup(&self, identity: &RequestIdentity) -> Result<Option<CachedEntry>>;

    /// Insert or overwrite the entry for `identity`.
    async fn store(&self, identity: &RequestIdentity, entry: CachedEntry) -> Result<()>;
}

// ============================================================================
// Telemetry
// ============================================================================

/// Sink for per-request hit/miss events.
///
/// The engine calls `record` on a detached task; errors are logged and
/// dropped.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn record(&self, event: TelemetryEvent) -> Result<()>;
}
