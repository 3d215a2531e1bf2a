//! Request identities and the origin they are rewritten onto.

use std::fmt;

use url::Url;

use crate::{MimirError, Result};

/// The rewritten origin URL of an inbound request.
///
/// Used both as the object store key and as the fetch target. Derived once
/// per request and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestIdentity(Url);

impl RequestIdentity {
    /// Parse an absolute URL into an identity.
    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self(Url::parse(url)?))
    }

    pub fn from_url(url: Url) -> Self {
        Self(url)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Canonical string form, used as the store key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Path component, used for telemetry correlation.
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Whether this identity addresses the bucket root.
    pub fn is_root(&self) -> bool {
        self.0.path() == "/"
    }
}

impl fmt::Display for RequestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The configured origin that inbound requests are rewritten onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginTarget {
    base: Url,
}

impl OriginTarget {
    /// Build a target from a scheme and a host (optionally `host:port`).
    ///
    /// A host that already carries a scheme (`http://minio:9000`) is taken
    /// as-is and `scheme` is ignored.
    pub fn new(scheme: &str, host: &str) -> Result<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(MimirError::MissingOrigin);
        }
        let raw = if host.contains("://") {
            format!("{}/", host.trim_end_matches('/'))
        } else {
            format!("{scheme}://{host}/")
        };
        let base = Url::parse(&raw).map_err(|e| {
            MimirError::Configuration(format!("invalid origin host {host:?}: {e}"))
        })?;
        if base.host_str().is_none() || base.path() != "/" || base.cannot_be_a_base() {
            return Err(MimirError::Configuration(format!(
                "origin host {host:?} must be a bare host, optionally with a port"
            )));
        }
        Ok(Self { base })
    }

    /// Origin base URL (always ends in `/`).
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Rewrite an inbound path-and-query onto the origin.
    ///
    /// Scheme, host and port always come from the target; only path and
    /// query are taken from the request.
    pub fn rewrite(&self, path_and_query: &str) -> Result<RequestIdentity> {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };
        let mut url = self.base.clone();
        if path.starts_with('/') {
            url.set_path(path);
        } else {
            url.set_path(&format!("/{path}"));
        }
        url.set_query(query);
        Ok(RequestIdentity(url))
    }
}
