//! Transient credential storage for the OAuth handoff window.
//!
//! The callback handler writes the provider's token response here; the
//! caller retrieves it exactly once through [`CredentialHandoff`]. Nothing
//! is persisted beyond the store TTL; refresh and long-term storage are
//! out of scope for this service.

use serde::{Deserialize, Serialize};

mod handoff;

pub use handoff::CredentialHandoff;

/// Store key for the credentials of a (user, organization) pair.
pub fn credentials_key(org_id: &str, user_id: &str) -> String {
    format!("credentials:{}:{}", org_id, user_id)
}

/// A provider token response.
///
/// Kept opaque apart from the access token: whatever else the provider
/// returns (refresh token, expiry, token type) rides along in `extra` and
/// round-trips unchanged through the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// OAuth access token (used for API requests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Remaining token response fields, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(credentials_key("org1", "user1"), "credentials:org1:user1");
    }

    #[test]
    fn test_record_roundtrip_preserves_extra_fields() {
        let json = r#"{
            "access_token": "pat-na1-12345",
            "refresh_token": "refresh-67890",
            "expires_in": 1800,
            "token_type": "bearer"
        }"#;

        let record: CredentialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.access_token.as_deref(), Some("pat-na1-12345"));
        assert_eq!(record.extra["expires_in"], 1800);

        let reserialized = serde_json::to_value(&record).unwrap();
        assert_eq!(reserialized["refresh_token"], "refresh-67890");
        assert_eq!(reserialized["token_type"], "bearer");
    }

    #[test]
    fn test_record_without_access_token() {
        let record: CredentialRecord = serde_json::from_str(r#"{"scope": "crm"}"#).unwrap();
        assert!(record.access_token.is_none());
        // Absent token stays absent on the wire
        let reserialized = serde_json::to_string(&record).unwrap();
        assert!(!reserialized.contains("access_token"));
    }
}
