//! One-time credential retrieval.

use chrono::Duration;
use std::sync::Arc;
use tracing::warn;

use super::{credentials_key, CredentialRecord};
use crate::error::IntegrationError;
use crate::store::KeyValueStore;

/// Read-once accessor for stored credentials.
///
/// Written once per completed OAuth flow, read at most once; unread entries
/// expire with the store TTL. Delete-on-read is not atomic against a
/// concurrent duplicate retrieval; the TTL bounds that window.
#[derive(Clone)]
pub struct CredentialHandoff {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl CredentialHandoff {
    /// Create a handoff writing credentials with the given TTL.
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Persist a token response for later one-time retrieval.
    pub async fn store(
        &self,
        user_id: &str,
        org_id: &str,
        record: &CredentialRecord,
    ) -> Result<(), IntegrationError> {
        let json = serde_json::to_string(record).map_err(|e| {
            IntegrationError::Internal(format!("failed to encode credentials: {}", e))
        })?;
        self.store
            .set(&credentials_key(org_id, user_id), &json, self.ttl)
            .await?;
        Ok(())
    }

    /// Retrieve and consume the stored credentials.
    ///
    /// The entry is deleted before returning. A deletion failure is logged
    /// and ignored; the store TTL bounds how long the entry can linger.
    pub async fn retrieve(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> Result<CredentialRecord, IntegrationError> {
        let key = credentials_key(org_id, user_id);

        let raw = self
            .store
            .get(&key)
            .await?
            .ok_or(IntegrationError::NotFound)?;

        let record: CredentialRecord =
            serde_json::from_str(&raw).map_err(|_| IntegrationError::InvalidFormat)?;

        if let Err(e) = self.store.delete(&key).await {
            warn!(key = %key, error = %e, "Failed to delete credentials after read");
        }

        Ok(record)
    }
}
