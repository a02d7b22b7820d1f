//! Ephemeral key-value storage for in-flight OAuth state and credentials.
//!
//! Components only depend on the [`KeyValueStore`] contract: string keys,
//! string values, per-entry TTL. The shipped [`MemoryStore`] keeps entries
//! in-process; a Redis-backed implementation would plug into the same trait.

use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

mod memory;

pub use memory::{run_store_cleanup, MemoryStore};

/// Key-value store backend failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Contract for the ephemeral store.
///
/// All operations are treated as remote, potentially-latent calls. Expired
/// entries behave as absent.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Fetch the value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove the entry under `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
