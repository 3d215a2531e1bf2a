//! axum front end.
//!
//! Every path is served by one fallback handler that forwards the request to
//! [`RequestRouter::route`] and streams the resulting [`ProxyResponse`] back.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use tracing::warn;

use crate::router::{InboundRequest, RequestRouter};
use crate::types::ProxyResponse;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    router: Arc<RequestRouter>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(router: RequestRouter, request_timeout: Duration) -> Self {
        Self {
            router: Arc::new(router),
            request_timeout,
        }
    }
}

/// Build the axum router serving every path through `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new().fallback(proxy).with_state(state)
}

async fn proxy(State(state): State<AppState>, request: Request) -> Response {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| "/".to_owned());
    let inbound = InboundRequest::new(request.method().clone(), path_and_query);

    let response =
        match tokio::time::timeout(state.request_timeout, state.router.route(inbound)).await {
            Ok(response) => response,
            Err(_) => {
                warn!(timeout = ?state.request_timeout, "request timed out");
                ProxyResponse::text(StatusCode::GATEWAY_TIMEOUT, "request timed out")
            }
        };

    into_axum_response(response)
}

/// Convert a [`ProxyResponse`] into an axum response, streaming the body.
pub fn into_axum_response(response: ProxyResponse) -> Response {
    let mut out = Response::new(axum::body::Body::from_stream(response.body.into_stream()));
    *out.status_mut() = response.status;
    *out.headers_mut() = response.headers;
    out
}
