//! Builder for configuring router instances

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::cache::{MemoryStore, StoreConfig};
use crate::engine::RevalidationEngine;
use crate::origin::{DEFAULT_TIMEOUT, HttpOrigin};
use crate::router::RequestRouter;
use crate::telemetry::{MetricsSink, NoopSink};
use crate::traits::{ObjectStore, OriginClient, TelemetrySink};
use crate::types::OriginTarget;
use crate::{MimirError, Result};

/// Main entry point for creating router instances.
pub struct Mimir;

impl Mimir {
    /// Create a new builder for configuring the router.
    pub fn builder() -> MimirBuilder {
        MimirBuilder::new()
    }
}

/// Builder for configuring router instances.
///
/// ```rust
/// # use mimir::Mimir;
/// let router = Mimir::builder()
///     .origin_host("my-bucket.s3.eu-west-1.amazonaws.com")
///     .build()?;
/// # Ok::<(), mimir::MimirError>(())
/// ```
pub struct MimirBuilder {
    origin_host: Option<String>,
    origin_scheme: String,
    timeout: Duration,
    store_config: StoreConfig,
    store: Option<Arc<dyn ObjectStore>>,
    origin: Option<Arc<dyn OriginClient>>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl MimirBuilder {
    pub fn new() -> Self {
        Self {
            origin_host: None,
            origin_scheme: "https".to_string(),
            timeout: DEFAULT_TIMEOUT,
            store_config: StoreConfig::default(),
            store: None,
            origin: None,
            telemetry: None,
        }
    }

    /// Set the origin bucket host (`host` or `host:port`).
    pub fn origin_host(mut self, host: impl Into<String>) -> Self {
        self.origin_host = Some(host.into());
        self
    }

    /// Set the origin host from an optional value (e.g. config or env).
    pub fn maybe_origin_host(mut self, host: Option<String>) -> Self {
        self.origin_host = host;
        self
    }

    /// Scheme used to reach the origin (default: `https`).
    pub fn origin_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.origin_scheme = scheme.into();
        self
    }

    /// Set the origin request timeout (default: 30 seconds).
    ///
    /// Ignored when a custom origin client is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the built-in in-memory store.
    ///
    /// Ignored when a custom store is supplied.
    pub fn store_config(mut self, config: StoreConfig) -> Self {
        self.store_config = config;
        self
    }

    /// Use a custom object store backend.
    pub fn store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a custom origin client.
    pub fn origin(mut self, origin: Arc<dyn OriginClient>) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Use a custom telemetry sink (default: [`MetricsSink`]).
    pub fn telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Drop all telemetry events.
    pub fn disable_telemetry(mut self) -> Self {
        self.telemetry = Some(Arc::new(NoopSink));
        self
    }

    /// Build the router.
    ///
    /// A missing or empty origin host is not an error here: the router is
    /// built and answers every request with a configuration error. A host
    /// that cannot be parsed is rejected.
    pub fn build(self) -> Result<RequestRouter> {
        let target = match self.origin_host.as_deref() {
            Some(host) => match OriginTarget::new(&self.origin_scheme, host) {
                Ok(target) => Some(target),
                Err(MimirError::MissingOrigin) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };
        if target.is_none() {
            warn!("no origin host configured; requests will be answered with 500");
        }

        let origin: Arc<dyn OriginClient> = match self.origin {
            Some(origin) => origin,
            None => Arc::new(HttpOrigin::new(self.timeout)?),
        };
        let store: Arc<dyn ObjectStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryStore::new(&self.store_config)),
        };
        let telemetry: Arc<dyn TelemetrySink> = match self.telemetry {
            Some(telemetry) => telemetry,
            None => Arc::new(MetricsSink),
        };

        let engine = RevalidationEngine::new(origin.clone(), store, telemetry);
        Ok(RequestRouter::new(target, origin, engine))
    }
}

impl Default for MimirBuilder {
    fn default() -> Self {
        Self::new()
    }
}
