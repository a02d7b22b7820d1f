//! In-process key-value store with per-entry expiry.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{KeyValueStore, StoreError};

#[derive(Clone, Debug)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-memory [`KeyValueStore`] implementation.
///
/// Entries expire lazily on read; [`run_store_cleanup`] sweeps the map
/// periodically so abandoned flows do not accumulate.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Remove all expired entries.
    pub fn cleanup_expired(&self) {
        let mut entries = self.entries.lock().unwrap();
        let now = Utc::now();
        entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of live entries (for monitoring).
    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {}", e)))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Utc::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                // Expired: treat as absent and drop it now
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        entries.remove(key);
        Ok(())
    }
}

/// Background task to periodically sweep expired entries.
pub async fn run_store_cleanup(store: MemoryStore, interval_seconds: u64) {
    let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        store.cleanup_expired();
        tracing::debug!("store cleanup complete, {} entries remaining", store.count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();

        store
            .set("state:org1:user1", "value-1", Duration::seconds(600))
            .await
            .unwrap();

        let value = store.get("state:org1:user1").await.unwrap();
        assert_eq!(value, Some("value-1".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();

        let value = store.get("state:org1:user1").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();

        store
            .set("credentials:org1:user1", "old", Duration::seconds(600))
            .await
            .unwrap();
        store
            .set("credentials:org1:user1", "new", Duration::seconds(600))
            .await
            .unwrap();

        let value = store.get("credentials:org1:user1").await.unwrap();
        assert_eq!(value, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();

        store
            .set("state:org1:user1", "value-1", Duration::seconds(600))
            .await
            .unwrap();
        store.delete("state:org1:user1").await.unwrap();

        assert_eq!(store.get("state:org1:user1").await.unwrap(), None);

        // Deleting an absent key is fine
        store.delete("state:org1:user1").await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_entry_treated_as_absent() {
        let store = MemoryStore::new();

        store
            .set("state:org1:user1", "value-1", Duration::seconds(1))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        assert_eq!(store.get("state:org1:user1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cleanup_removes_expired() {
        let store = MemoryStore::new();

        store
            .set("a", "1", Duration::seconds(1))
            .await
            .unwrap();
        store
            .set("b", "2", Duration::seconds(600))
            .await
            .unwrap();

        assert_eq!(store.count(), 2);

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        store.cleanup_expired();
        assert_eq!(store.count(), 1);
        assert_eq!(store.get("b").await.unwrap(), Some("2".to_string()));
    }
}
