//! In-memory object store.
//!
//! [`MemoryStore`] keeps entries in moka's async-friendly cache, keyed on
//! the canonical request identity. Capacity is a byte budget: each entry
//! weighs its body plus stored headers, and moka evicts once the total
//! exceeds `max_bytes`. An optional time-to-live lets the store expire
//! entries on its own. The `cache-control` header written by the engine is
//! never consulted here.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;

use crate::Result;
use crate::traits::ObjectStore;
use crate::types::{CachedEntry, RequestIdentity};

/// Configuration for the in-memory store.
///
/// ```rust
/// # use mimir::cache::StoreConfig;
/// # use std::time::Duration;
/// let config = StoreConfig::new()
///     .max_bytes(1024 * 1024 * 1024)
///     .ttl(Duration::from_secs(86_400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Total weight of stored entries in bytes. Default: 256 MiB.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// Store-owned expiry. Default: none (entries live until evicted).
    #[serde(default, rename = "ttl_secs", deserialize_with = "de_ttl_secs")]
    pub ttl: Option<Duration>,
}

fn default_max_bytes() -> u64 {
    256 * 1024 * 1024
}

fn de_ttl_secs<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            ttl: None,
        }
    }
}

impl StoreConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte budget for stored entries.
    pub fn max_bytes(mut self, n: u64) -> Self {
        self.max_bytes = n;
        self
    }

    /// Expire entries after `ttl` regardless of origin validators.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Bounded in-process [`ObjectStore`].
pub struct MemoryStore {
    entries: Cache<String, CachedEntry>,
}

impl MemoryStore {
    /// Create a store with the given configuration.
    pub fn new(config: &StoreConfig) -> Self {
        let mut builder = Cache::builder()
            .weigher(|_key: &String, entry: &CachedEntry| entry.weight())
            .max_capacity(config.max_bytes);
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            entries: builder.build(),
        }
    }

    /// Number of entries currently stored (approximate until pending
    /// maintenance runs).
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total weight of stored entries in bytes (approximate until pending
    /// maintenance runs).
    pub fn weighted_size(&self) -> u64 {
        self.entries.weighted_size()
    }

    /// Apply pending evictions and expirations now.
    pub async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn lookup(&self, identity: &RequestIdentity) -> Result<Option<CachedEntry>> {
        Ok(self.entries.get(identity.as_str()).await)
    }

    async fn store(&self, identity: &RequestIdentity, entry: CachedEntry) -> Result<()> {
        self.entries.insert(identity.as_str().to_owned(), entry).await;
        Ok(())
    }
}
