//! Public types for the Mimir API.

mod body;
mod entry;
mod event;
mod identity;
mod outcome;
mod response;

pub use body::{Body, ByteStream};
pub use entry::{CACHE_CONTROL_VALUE, CachedEntry, STORED_HEADERS, Validators, normalize_headers};
pub use event::{Classification, TelemetryEvent};
pub use identity::{OriginTarget, RequestIdentity};
pub use outcome::ValidationOutcome;
pub use response::ProxyResponse;
