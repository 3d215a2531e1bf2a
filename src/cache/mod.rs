//! Object store backends.
//!
//! The revalidation engine only needs an [`ObjectStore`](crate::traits::ObjectStore).
//! [`MemoryStore`] is the built-in backend: a bounded in-process moka cache
//! that owns its own eviction. Shared backends (redis, a CDN cache API)
//! plug in by implementing the same trait and passing it to
//! [`MimirBuilder::store()`](crate::MimirBuilder::store).

pub mod memory;

pub use memory::{MemoryStore, StoreConfig};
