//! Mimir - revalidating reverse-proxy cache for object-storage buckets
//!
//! Mimir sits in front of a bucket endpoint (S3, R2, GCS, MinIO, ...) and
//! serves objects from an [`ObjectStore`], checking each stored object
//! against the origin with a cheap conditional `HEAD` before serving it.
//! Changed or unknown objects are fetched with a full `GET` and stored with
//! a normalized header set; non-200 origin answers pass through uncached.
//!
//! The bucket root (`/`) is always proxied directly, since it typically
//! serves a listing that should never go stale.
//!
//! # Example
//!
//! ```rust,no_run
//! use mimir::{InboundRequest, Mimir};
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let router = Mimir::builder()
//!         .origin_host("my-bucket.s3.eu-west-1.amazonaws.com")
//!         .build()?;
//!
//!     let response = router.route(InboundRequest::get("/images/logo.png")).await;
//!     println!("{} {:?}", response.status, response.header("etag"));
//!     Ok(())
//! }
//! ```

mod builder;
pub mod cache;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod origin;
pub mod router;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod traits;
pub mod types;
mod version;

// Re-export main types at crate root
pub use builder::{Mimir, MimirBuilder};
pub use engine::RevalidationEngine;
pub use error::{MimirError, Result};
pub use router::{InboundRequest, RequestRouter};
pub use traits::{ConditionalHeaders, FetchMethod, ObjectStore, OriginClient, TelemetrySink};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, git_dirty, version_string};

// Re-export all types
pub use types::{
    Body, CachedEntry, Classification, OriginTarget, ProxyResponse, RequestIdentity,
    TelemetryEvent, ValidationOutcome, Validators,
};
