//! Process-wide configuration.
//!
//! Secrets (client id, client secret, redirect URI) come from the process
//! environment at startup and are validated for presence only. Operational
//! settings come from an optional TOML file with defaults.

use anyhow::{Context, Result};
use serde::Deserialize;

/// HubSpot OAuth authorization endpoint.
pub const AUTHORIZATION_URL: &str = "https://app.hubspot.com/oauth/authorize";

/// HubSpot OAuth token exchange endpoint.
pub const TOKEN_URL: &str = "https://api.hubspot.com/oauth/v1/token";

/// HubSpot CRM object API base URL.
pub const API_BASE_URL: &str = "https://api.hubapi.com";

const SCOPES: &[&str] = &["crm.objects.contacts.read", "crm.objects.companies.read"];

/// OAuth provider configuration, immutable after startup.
///
/// Endpoint URLs are fields rather than hardcoded at the call sites so
/// tests can point the flow at a mock server.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Redirect URI registered with the provider
    pub redirect_uri: String,

    /// Authorization endpoint URL
    pub auth_url: String,

    /// Token exchange endpoint URL
    pub token_url: String,

    /// Object API base URL
    pub api_base_url: String,

    /// Required OAuth scopes
    pub scopes: Vec<String>,
}

impl ProviderConfig {
    /// Load provider secrets from the environment.
    ///
    /// Required variables: `CRMLINK_OAUTH_HUBSPOT_CLIENT_ID`,
    /// `CRMLINK_OAUTH_HUBSPOT_CLIENT_SECRET`,
    /// `CRMLINK_OAUTH_HUBSPOT_REDIRECT_URI`.
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("CRMLINK_OAUTH_HUBSPOT_CLIENT_ID")
            .context("CRMLINK_OAUTH_HUBSPOT_CLIENT_ID is required")?;
        let client_secret = std::env::var("CRMLINK_OAUTH_HUBSPOT_CLIENT_SECRET")
            .context("CRMLINK_OAUTH_HUBSPOT_CLIENT_SECRET is required")?;
        let redirect_uri = std::env::var("CRMLINK_OAUTH_HUBSPOT_REDIRECT_URI")
            .context("CRMLINK_OAUTH_HUBSPOT_REDIRECT_URI is required")?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            auth_url: AUTHORIZATION_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            api_base_url: API_BASE_URL.to_string(),
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Build the provider authorization URL embedding the encoded state.
    pub fn build_auth_url(&self, state: &str) -> String {
        let scopes = self.scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(state)
        )
    }
}

/// Server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// How long issued state envelopes remain valid (seconds)
    #[serde(default = "default_ttl_seconds")]
    pub state_ttl_seconds: i64,

    /// How long stored credentials remain retrievable (seconds)
    #[serde(default = "default_ttl_seconds")]
    pub credentials_ttl_seconds: i64,

    /// How often the store sweeps expired entries (seconds)
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_ttl_seconds() -> i64 {
    600
}

fn default_cleanup_interval() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            state_ttl_seconds: default_ttl_seconds(),
            credentials_ttl_seconds: default_ttl_seconds(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

/// Load server settings from a TOML file
pub fn load_config(path: &str) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&contents)?;
    Ok(config)
}
