//! HTTP client for the HubSpot CRM object API.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::error::IntegrationError;

/// One record from a CRM object collection.
///
/// `id` is kept as raw JSON: the v3 API sends strings, but older payloads
/// carry numbers, and the transformer stringifies either.
#[derive(Debug, Deserialize)]
pub struct HubSpotObject {
    pub id: Value,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// One page of a collection listing.
#[derive(Debug, Deserialize)]
struct ObjectPage {
    #[serde(default)]
    results: Vec<HubSpotObject>,
}

/// Bearer-authenticated client for the CRM object endpoints.
pub struct HubSpotClient {
    access_token: String,
    http_client: Client,
    base_url: String,
}

impl HubSpotClient {
    /// Create a client against the given API base URL.
    pub fn new(access_token: String, base_url: String) -> Self {
        Self {
            access_token,
            http_client: Client::new(),
            base_url,
        }
    }

    /// Fetch the companies collection.
    pub async fn fetch_companies(&self) -> Result<Vec<HubSpotObject>, IntegrationError> {
        self.fetch_objects("companies").await
    }

    /// Fetch the contacts collection.
    pub async fn fetch_contacts(&self) -> Result<Vec<HubSpotObject>, IntegrationError> {
        self.fetch_objects("contacts").await
    }

    /// Fetch one object collection.
    ///
    /// Non-2xx aborts with the upstream status and body preserved. A 2xx
    /// status other than exactly 200 yields an empty collection rather than
    /// an error (nothing to parse).
    async fn fetch_objects(&self, collection: &str) -> Result<Vec<HubSpotObject>, IntegrationError> {
        let url = format!("{}/crm/v3/objects/{}", self.base_url, collection);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| IntegrationError::UpstreamFetchFailed {
                collection: collection.to_string(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IntegrationError::UpstreamFetchFailed {
                collection: collection.to_string(),
                detail: format!("status {}: {}", status, body),
            });
        }

        if status != StatusCode::OK {
            return Ok(Vec::new());
        }

        let page: ObjectPage =
            response
                .json()
                .await
                .map_err(|e| IntegrationError::UpstreamFetchFailed {
                    collection: collection.to_string(),
                    detail: format!("failed to parse response: {}", e),
                })?;
        Ok(page.results)
    }
}
