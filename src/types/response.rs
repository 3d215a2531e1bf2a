//! Responses passed between components and back to the client.

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use super::Body;
use crate::MimirError;

/// Status, headers and body of an HTTP response.
///
/// Origin responses, stored entries and error responses all travel as this
/// type; non-2xx statuses are ordinary values.
#[derive(Debug)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

impl ProxyResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Body) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Plain-text response carrying a diagnostic message.
    pub fn text(status: StatusCode, message: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        Self::new(status, headers, Body::from(message.into()))
    }

    /// Header value as a string, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl From<MimirError> for ProxyResponse {
    fn from(err: MimirError) -> Self {
        ProxyResponse::text(err.status(), err.to_string())
    }
}
