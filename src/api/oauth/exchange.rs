//! OAuth token exchange logic.

use std::collections::HashMap;

use crate::config::ProviderConfig;
use crate::credentials::CredentialRecord;
use crate::error::IntegrationError;

/// Exchange an authorization code for the provider's token response.
///
/// POSTs the standard `authorization_code` grant as form data. Transport
/// errors, non-2xx responses, and unparseable bodies all surface as
/// [`IntegrationError::TokenExchangeFailed`] with the upstream detail
/// preserved.
pub async fn exchange_code_for_token(
    provider: &ProviderConfig,
    code: &str,
) -> Result<CredentialRecord, IntegrationError> {
    let client = reqwest::Client::new();

    let mut form_data = HashMap::new();
    form_data.insert("grant_type", "authorization_code");
    form_data.insert("client_id", provider.client_id.as_str());
    form_data.insert("client_secret", provider.client_secret.as_str());
    form_data.insert("redirect_uri", provider.redirect_uri.as_str());
    form_data.insert("code", code);

    tracing::debug!(token_url = %provider.token_url, "Exchanging authorization code for token");

    let response = client
        .post(&provider.token_url)
        .header("Accept", "application/json")
        .form(&form_data)
        .send()
        .await
        .map_err(|e| IntegrationError::TokenExchangeFailed {
            status: None,
            detail: format!("request failed: {}", e),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(IntegrationError::TokenExchangeFailed {
            status: Some(status.as_u16()),
            detail: format!("status {}: {}", status, body),
        });
    }

    response
        .json::<CredentialRecord>()
        .await
        .map_err(|e| IntegrationError::TokenExchangeFailed {
            status: Some(status.as_u16()),
            detail: format!("failed to parse token response: {}", e),
        })
}
