//! Credential handoff and item aggregation endpoints.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::credentials::{CredentialHandoff, CredentialRecord};
use crate::error::IntegrationError;
use crate::hubspot;
use crate::item::IntegrationItem;

/// Shared application state for the integration endpoints
#[derive(Clone)]
pub struct IntegrationAppState {
    pub provider: Arc<ProviderConfig>,
    pub handoff: CredentialHandoff,
}

/// Request body for the credentials endpoint
#[derive(Deserialize)]
pub struct CredentialsRequest {
    user_id: String,
    org_id: String,
}

/// Create the integration API router
pub fn create_integration_router(state: IntegrationAppState) -> Router {
    Router::new()
        .route(
            "/api/integrations/hubspot/credentials",
            post(get_credentials),
        )
        .route("/api/integrations/hubspot/items", post(load_items))
        .with_state(Arc::new(state))
}

/// POST /api/integrations/hubspot/credentials
///
/// Returns the stored credentials for a (user, org) pair exactly once;
/// the entry is consumed by the read.
async fn get_credentials(
    State(state): State<Arc<IntegrationAppState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<CredentialRecord>, IntegrationError> {
    debug!(user_id = %request.user_id, org_id = %request.org_id, "Credential retrieval requested");

    let record = state
        .handoff
        .retrieve(&request.user_id, &request.org_id)
        .await?;

    info!(
        user_id = %request.user_id,
        org_id = %request.org_id,
        "Credentials handed off"
    );

    Ok(Json(record))
}

/// POST /api/integrations/hubspot/items
///
/// Fetches and normalizes the companies and contacts collections using the
/// credential record supplied in the body.
async fn load_items(
    State(state): State<Arc<IntegrationAppState>>,
    Json(record): Json<CredentialRecord>,
) -> Result<Json<Vec<IntegrationItem>>, IntegrationError> {
    let items = hubspot::fetch_items(&record, &state.provider.api_base_url).await?;

    info!(count = items.len(), "Items aggregated");

    Ok(Json(items))
}
