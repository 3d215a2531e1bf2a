//! HTTP origin client.
//!
//! [`HttpOrigin`] talks to the bucket endpoint with reqwest. It never
//! follows redirects: a `3xx` from the bucket is a non-200 response that
//! the engine forwards verbatim and never stores.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::telemetry;
use crate::traits::{ConditionalHeaders, FetchMethod, OriginClient};
use crate::types::{Body, ProxyResponse, RequestIdentity};
use crate::{MimirError, Result};

/// Default origin request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`OriginClient`] backed by a reqwest connection pool.
#[derive(Debug, Clone)]
pub struct HttpOrigin {
    client: reqwest::Client,
}

impl HttpOrigin {
    /// Create a client whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .user_agent(concat!("mimir/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MimirError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl OriginClient for HttpOrigin {
    async fn fetch(
        &self,
        method: FetchMethod,
        identity: &RequestIdentity,
        conditional: &ConditionalHeaders,
    ) -> Result<ProxyResponse> {
        let start = Instant::now();
        let result = self
            .client
            .request(method.into(), identity.url().clone())
            .headers(conditional.to_header_map())
            .send()
            .await;

        metrics::histogram!(
            telemetry::ORIGIN_REQUEST_DURATION_SECONDS,
            "method" => method.as_str()
        )
        .record(start.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::counter!(
                    telemetry::ORIGIN_REQUESTS_TOTAL,
                    "method" => method.as_str(),
                    "status" => "error"
                )
                .increment(1);
                return Err(MimirError::OriginTransport(format!("{identity}: {e}")));
            }
        };

        let status = response.status();
        metrics::counter!(
            telemetry::ORIGIN_REQUESTS_TOTAL,
            "method" => method.as_str(),
            "status" => status.as_u16().to_string()
        )
        .increment(1);
        debug!(method = method.as_str(), %identity, status = status.as_u16(), "origin responded");

        let headers = response.headers().clone();
        let body = match method {
            FetchMethod::Head => Body::empty(),
            FetchMethod::Get => {
                Body::from_stream(response.bytes_stream().map(|chunk| chunk.map_err(MimirError::from)))
            }
        };
        Ok(ProxyResponse::new(status, headers, body))
    }
}
