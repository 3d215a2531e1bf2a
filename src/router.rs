//! Request routing.
//!
//! [`RequestRouter::route`] is the entry point for every inbound request. It
//! rewrites the target onto the origin, proxies the bucket root directly,
//! hands everything else to the [`RevalidationEngine`], and turns any error
//! on the way into an error response.

use std::sync::Arc;

use reqwest::Method;
use tracing::{error, info};

use crate::engine::RevalidationEngine;
use crate::telemetry;
use crate::traits::{ConditionalHeaders, FetchMethod, OriginClient};
use crate::types::{OriginTarget, ProxyResponse};
use crate::{MimirError, Result};

/// The parts of an inbound request the router looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    /// Logged only; every request is served with GET semantics.
    pub method: Method,
    /// Path plus optional `?query`, as received.
    pub path_and_query: String,
}

impl InboundRequest {
    pub fn new(method: Method, path_and_query: impl Into<String>) -> Self {
        Self {
            method,
            path_and_query: path_and_query.into(),
        }
    }

    /// A `GET` for `path_and_query`.
    pub fn get(path_and_query: impl Into<String>) -> Self {
        Self::new(Method::GET, path_and_query)
    }
}

/// Dispatches inbound requests to the direct proxy or the engine.
#[derive(Clone)]
pub struct RequestRouter {
    target: Option<OriginTarget>,
    origin: Arc<dyn OriginClient>,
    engine: RevalidationEngine,
}

impl RequestRouter {
    /// `target` is `None` when no origin host is configured; every request
    /// is then answered with a configuration error.
    pub fn new(
        target: Option<OriginTarget>,
        origin: Arc<dyn OriginClient>,
        engine: RevalidationEngine,
    ) -> Self {
        Self {
            target,
            origin,
            engine,
        }
    }

    pub fn target(&self) -> Option<&OriginTarget> {
        self.target.as_ref()
    }

    /// Answer `request`. Never fails: errors become error responses.
    pub async fn route(&self, request: InboundRequest) -> ProxyResponse {
        info!(method = %request.method, path = %request.path_and_query, "handling request");
        let (route, result) = self.dispatch(&request).await;
        let response = result.unwrap_or_else(|e| {
            error!(path = %request.path_and_query, error = %e, "request failed");
            ProxyResponse::from(e)
        });
        metrics::counter!(
            telemetry::REQUESTS_TOTAL,
            "route" => route,
            "status" => response.status.as_u16().to_string()
        )
        .increment(1);
        response
    }

    async fn dispatch(&self, request: &InboundRequest) -> (&'static str, Result<ProxyResponse>) {
        let identity = match self
            .target
            .as_ref()
            .ok_or(MimirError::MissingOrigin)
            .and_then(|target| target.rewrite(&request.path_and_query))
        {
            Ok(identity) => identity,
            Err(e) => return ("rejected", Err(e)),
        };

        if identity.is_root() {
            info!(%identity, "proxying without cache");
            let result = self
                .origin
                .fetch(FetchMethod::Get, &identity, &ConditionalHeaders::none())
                .await;
            return ("direct", result);
        }

        ("cached", self.engine.resolve(&identity).await)
    }
}
