//! OAuth state management for CSRF protection.
//!
//! A state envelope binds an in-flight OAuth flow to a (user, organization)
//! pair. The envelope travels through the provider redirect as a reversible
//! base64 encoding and is independently persisted in the key-value store;
//! authenticity comes from comparing the two nonces, not from a signature.

use base64::{engine::general_purpose::URL_SAFE, Engine};
use chrono::Duration;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::IntegrationError;
use crate::store::KeyValueStore;

/// Anti-CSRF state envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateEnvelope {
    pub nonce: String,
    pub user_id: String,
    pub org_id: String,
}

/// Store key for the envelope of a (user, organization) pair.
pub fn state_key(org_id: &str, user_id: &str) -> String {
    format!("state:{}:{}", org_id, user_id)
}

/// Generate a nonce with 256 bits of entropy from the OS random source.
fn generate_nonce() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE.encode(bytes)
}

/// Encode an envelope for transport in the `state` query parameter.
///
/// Reversible without secret material; the store-side nonce comparison is
/// what actually authenticates the callback.
pub fn encode_state(envelope: &StateEnvelope) -> Result<String, IntegrationError> {
    let json = serde_json::to_string(envelope)
        .map_err(|e| IntegrationError::Internal(format!("failed to encode state: {}", e)))?;
    Ok(URL_SAFE.encode(json))
}

/// Decode a `state` query parameter back into an envelope.
pub fn decode_state(encoded: &str) -> Result<StateEnvelope, IntegrationError> {
    let bytes = URL_SAFE
        .decode(encoded)
        .map_err(|_| IntegrationError::MalformedState)?;
    serde_json::from_slice(&bytes).map_err(|_| IntegrationError::MalformedState)
}

/// Issues and validates state envelopes against the key-value store.
#[derive(Clone)]
pub struct StateTokenManager {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl StateTokenManager {
    /// Create a manager writing envelopes with the given TTL.
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Create a fresh envelope, persist it, and return its encoded form.
    pub async fn issue(&self, user_id: &str, org_id: &str) -> Result<String, IntegrationError> {
        let envelope = StateEnvelope {
            nonce: generate_nonce(),
            user_id: user_id.to_string(),
            org_id: org_id.to_string(),
        };

        let json = serde_json::to_string(&envelope)
            .map_err(|e| IntegrationError::Internal(format!("failed to encode state: {}", e)))?;
        self.store
            .set(&state_key(org_id, user_id), &json, self.ttl)
            .await?;

        encode_state(&envelope)
    }

    /// Validate an encoded state against the stored envelope.
    ///
    /// Does not consume the stored entry; the caller discards it once the
    /// rest of the callback is in flight.
    pub async fn validate(
        &self,
        encoded: &str,
        org_id: &str,
        user_id: &str,
    ) -> Result<StateEnvelope, IntegrationError> {
        let envelope = decode_state(encoded)?;

        let saved = self
            .store
            .get(&state_key(org_id, user_id))
            .await?
            .ok_or(IntegrationError::StateMismatch)?;
        let saved: StateEnvelope =
            serde_json::from_str(&saved).map_err(|_| IntegrationError::StateMismatch)?;

        if saved.nonce != envelope.nonce {
            return Err(IntegrationError::StateMismatch);
        }

        Ok(envelope)
    }

    /// Delete the stored envelope for a (user, organization) pair (single-use).
    pub async fn discard(&self, org_id: &str, user_id: &str) -> Result<(), IntegrationError> {
        self.store.delete(&state_key(org_id, user_id)).await?;
        Ok(())
    }
}
