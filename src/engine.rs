//! Revalidation engine.
//!
//! Decides, per request identity, whether to serve a stored entry, refresh
//! it cheaply with a conditional `HEAD`, or fetch and store a new copy.
//!
//! ```text
//!   lookup ──absent──▶ FullFetch (miss event)
//!     │
//!   present
//!     ▼
//!   HEAD + validators ──304──▶ serve stored entry (hit event)
//!     │
//!   other status
//!     ▼
//!   FullFetch ──200──▶ normalize headers, duplicate body, store, serve
//!     │
//!   non-200 ──▶ forward origin response, store untouched
//! ```
//!
//! No telemetry is emitted when a stale entry triggers a refetch; only
//! cold misses and `304` hits are recorded. Events are delivered on a
//! spawned task, so a slow or failing sink never delays the response.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::Result;
use crate::telemetry;
use crate::traits::{ConditionalHeaders, FetchMethod, ObjectStore, OriginClient, TelemetrySink};
use crate::types::{
    CachedEntry, ProxyResponse, RequestIdentity, TelemetryEvent, ValidationOutcome,
};

/// Orchestrates store lookups, conditional origin requests and store updates.
///
/// Holds no per-request state; one engine serves all concurrent requests.
/// Concurrent misses for the same identity are not coalesced: each fetches
/// and stores, and the last write wins.
#[derive(Clone)]
pub struct RevalidationEngine {
    origin: Arc<dyn OriginClient>,
    store: Arc<dyn ObjectStore>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl RevalidationEngine {
    pub fn new(
        origin: Arc<dyn OriginClient>,
        store: Arc<dyn ObjectStore>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            origin,
            store,
            telemetry,
        }
    }

    /// Produce the response to serve for `identity`.
    ///
    /// Errors only when the origin cannot be reached, its body cannot be
    /// read, or the store lookup fails. Non-200 origin answers are returned
    /// as `Ok`.
    pub async fn resolve(&self, identity: &RequestIdentity) -> Result<ProxyResponse> {
        let outcome = self.validate(identity).await?;
        debug!(%identity, outcome = outcome.label(), "validated");
        match outcome {
            ValidationOutcome::Fresh(entry) => {
                info!(%identity, etag = ?entry.validators().etag, "cache hit");
                self.emit(TelemetryEvent::hit(identity.path()));
                Ok(entry.to_response())
            }
            ValidationOutcome::Stale => {
                info!(%identity, "cache invalidation");
                self.full_fetch(identity).await
            }
            ValidationOutcome::Miss => {
                info!(%identity, "cache miss");
                self.emit(TelemetryEvent::miss(identity.path()));
                self.full_fetch(identity).await
            }
        }
    }

    /// Look up `identity` and, if an entry exists, revalidate it against the
    /// origin with a conditional `HEAD`.
    ///
    /// The `HEAD` is sent even when the entry carries no validators.
    pub async fn validate(&self, identity: &RequestIdentity) -> Result<ValidationOutcome> {
        let Some(entry) = self.store.lookup(identity).await? else {
            return Ok(ValidationOutcome::Miss);
        };

        let conditional = ConditionalHeaders::from_validators(entry.validators());
        let head = self
            .origin
            .fetch(FetchMethod::Head, identity, &conditional)
            .await?;

        if head.status == StatusCode::NOT_MODIFIED {
            Ok(ValidationOutcome::Fresh(entry))
        } else {
            Ok(ValidationOutcome::Stale)
        }
    }

    /// Unconditional `GET`; stores and serves the result only on a `200`.
    async fn full_fetch(&self, identity: &RequestIdentity) -> Result<ProxyResponse> {
        info!(%identity, "updating cache");
        let response = self
            .origin
            .fetch(FetchMethod::Get, identity, &ConditionalHeaders::none())
            .await?;

        if response.status != StatusCode::OK {
            warn!(%identity, status = response.status.as_u16(), "origin returned non-200, not caching");
            return Ok(response);
        }

        let (to_store, to_serve) = response.body.duplicate().await?;
        let entry = CachedEntry::from_origin(identity, &response.headers, to_store.into_bytes().await?);
        let headers = entry.headers().clone();
        let etag = entry.validators().etag;

        // A failed write still serves the fresh body.
        match self.store.store(identity, entry).await {
            Ok(()) => {
                metrics::counter!(telemetry::STORE_WRITES_TOTAL).increment(1);
                info!(%identity, ?etag, "cache updated");
            }
            Err(e) => warn!(%identity, error = %e, "failed to store entry"),
        }

        Ok(ProxyResponse::new(StatusCode::OK, headers, to_serve))
    }

    /// Hand `event` to the sink without waiting for it.
    fn emit(&self, event: TelemetryEvent) {
        let telemetry = Arc::clone(&self.telemetry);
        tokio::spawn(async move {
            if let Err(e) = telemetry.record(event).await {
                warn!(error = %e, "telemetry event dropped");
            }
        });
    }
}
