//! Cached entries and header normalization.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{
    CACHE_CONTROL, CONTENT_LENGTH, ETAG, HeaderMap, HeaderName, HeaderValue, LAST_MODIFIED,
};

use super::{Body, ProxyResponse, RequestIdentity};

/// `cache-control` value written on every stored entry.
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=14400";

/// Origin headers carried over into a stored entry, when present.
pub const STORED_HEADERS: [HeaderName; 3] = [ETAG, LAST_MODIFIED, CONTENT_LENGTH];

/// Build the header set of a stored entry from an origin `200` response.
///
/// The result is exactly `cache-control` plus whichever of `etag`,
/// `last-modified` and `content-length` the origin supplied with a
/// non-empty value. Everything else is dropped.
pub fn normalize_headers(origin: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(1 + STORED_HEADERS.len());
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    for name in STORED_HEADERS {
        if let Some(value) = origin.get(&name).filter(|v| !v.is_empty()) {
            headers.insert(name, value.clone());
        }
    }
    headers
}

/// Origin-supplied validators used for conditional revalidation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validators {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl Validators {
    /// Read `etag` and `last-modified` from a header map.
    ///
    /// Values that are empty or not visible ASCII count as absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        Self {
            etag: read(ETAG),
            last_modified: read(LAST_MODIFIED),
        }
    }

    /// True when the origin supplied neither validator.
    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }
}

/// A stored origin response for one [`RequestIdentity`].
///
/// Only ever built from an origin `200`, so the status is implied.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry {
    key: String,
    headers: HeaderMap,
    body: Bytes,
}

impl CachedEntry {
    /// Build an entry from an origin `200` response, normalizing its headers.
    pub fn from_origin(identity: &RequestIdentity, origin_headers: &HeaderMap, body: Bytes) -> Self {
        Self {
            key: identity.as_str().to_owned(),
            headers: normalize_headers(origin_headers),
            body,
        }
    }

    /// Canonical identity this entry is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn validators(&self) -> Validators {
        Validators::from_headers(&self.headers)
    }

    pub fn cache_control(&self) -> Option<&str> {
        self.headers.get(CACHE_CONTROL).and_then(|v| v.to_str().ok())
    }

    pub fn content_length(&self) -> Option<&str> {
        self.headers.get(CONTENT_LENGTH).and_then(|v| v.to_str().ok())
    }

    /// Approximate memory held by this entry in bytes: body, key and
    /// stored headers. Saturates at `u32::MAX`.
    pub fn weight(&self) -> u32 {
        let headers: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.as_str().len() + value.len())
            .sum();
        u32::try_from(self.body.len() + self.key.len() + headers).unwrap_or(u32::MAX)
    }

    /// The response served for this entry. The stored bytes are shared, not
    /// copied, and never mutated.
    pub fn to_response(&self) -> ProxyResponse {
        ProxyResponse::new(
            StatusCode::OK,
            self.headers.clone(),
            Body::Full(self.body.clone()),
        )
    }
}
