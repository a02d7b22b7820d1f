//! OAuth 2.0 authorization flow endpoints.
//!
//! Implements the server side of the authorization code flow:
//! 1. Frontend opens GET /api/integrations/hubspot/oauth/start in a popup
//! 2. Redirect to HubSpot's authorization page (state envelope attached)
//! 3. User authorizes on the provider's site
//! 4. Provider redirects to /api/integrations/hubspot/oauth/callback
//! 5. Validate state, exchange code for token, store credentials
//! 6. Respond with a page that closes the popup
//!
//! Credentials are then retrieved exactly once via the credentials endpoint.

pub mod exchange;
pub mod state;

pub use state::{StateEnvelope, StateTokenManager};

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::credentials::CredentialHandoff;
use crate::error::IntegrationError;

/// Page served after a completed callback; closes the popup window.
const CALLBACK_PAGE: &str = "<html><script>window.close();</script></html>";

/// Shared application state for the OAuth endpoints
#[derive(Clone)]
pub struct OAuthAppState {
    pub provider: Arc<ProviderConfig>,
    pub state_manager: StateTokenManager,
    pub handoff: CredentialHandoff,
}

/// Query parameters for the start endpoint
#[derive(Deserialize)]
pub struct AuthorizeParams {
    user_id: String,
    org_id: String,
}

/// OAuth callback query parameters
#[derive(Deserialize)]
pub struct OAuthCallback {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Create the OAuth flow router
pub fn create_oauth_router(state: OAuthAppState) -> Router {
    Router::new()
        .route("/api/integrations/hubspot/oauth/start", get(oauth_start))
        .route(
            "/api/integrations/hubspot/oauth/callback",
            get(oauth_callback),
        )
        .with_state(Arc::new(state))
}

/// GET /api/integrations/hubspot/oauth/start
///
/// Issues a state envelope for the (user, org) pair and redirects to the
/// provider's authorization page.
async fn oauth_start(
    State(state): State<Arc<OAuthAppState>>,
    Query(params): Query<AuthorizeParams>,
) -> Result<Redirect, IntegrationError> {
    debug!(user_id = %params.user_id, org_id = %params.org_id, "OAuth start requested");

    let encoded_state = state
        .state_manager
        .issue(&params.user_id, &params.org_id)
        .await?;

    let auth_url = state.provider.build_auth_url(&encoded_state);

    info!(
        user_id = %params.user_id,
        org_id = %params.org_id,
        "Redirecting to OAuth provider"
    );

    Ok(Redirect::temporary(&auth_url))
}

/// GET /api/integrations/hubspot/oauth/callback
///
/// Validates the provider redirect, exchanges the code for a token, and
/// stores the credentials for one-time retrieval.
async fn oauth_callback(
    State(state): State<Arc<OAuthAppState>>,
    Query(callback): Query<OAuthCallback>,
) -> Result<Html<&'static str>, IntegrationError> {
    debug!("OAuth callback received");

    // Provider-reported denial ends the flow before anything else
    if let Some(error) = callback.error {
        let description = callback.error_description.unwrap_or(error);
        warn!(description = %description, "OAuth authorization failed");
        return Err(IntegrationError::ProviderDenied(description));
    }

    let encoded_state = callback.state.ok_or(IntegrationError::MalformedState)?;
    let code = callback
        .code
        .ok_or_else(|| IntegrationError::TokenExchangeFailed {
            status: None,
            detail: "missing 'code' parameter".to_string(),
        })?;

    // The envelope itself names the (user, org) pair to validate against
    let envelope = state::decode_state(&encoded_state)?;
    state
        .state_manager
        .validate(&encoded_state, &envelope.org_id, &envelope.user_id)
        .await?;

    debug!(
        user_id = %envelope.user_id,
        org_id = %envelope.org_id,
        "State validated"
    );

    // Exchange and state cleanup have no ordering dependency; run both to
    // completion before returning. A cleanup failure never masks the
    // exchange result.
    let (exchanged, discarded) = tokio::join!(
        exchange::exchange_code_for_token(&state.provider, &code),
        state
            .state_manager
            .discard(&envelope.org_id, &envelope.user_id),
    );
    if let Err(e) = discarded {
        warn!(
            org_id = %envelope.org_id,
            user_id = %envelope.user_id,
            error = %e,
            "Failed to discard consumed state entry"
        );
    }
    let record = exchanged?;

    state
        .handoff
        .store(&envelope.user_id, &envelope.org_id, &record)
        .await?;

    info!(
        user_id = %envelope.user_id,
        org_id = %envelope.org_id,
        "OAuth flow completed successfully"
    );

    Ok(Html(CALLBACK_PAGE))
}
