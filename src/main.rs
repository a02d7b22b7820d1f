use anyhow::{Context, Result};
use chrono::Duration;
use crmlink::api::{
    create_integration_router, create_oauth_router, IntegrationAppState, OAuthAppState,
    StateTokenManager,
};
use crmlink::config::{load_config, ProviderConfig, ServerConfig};
use crmlink::credentials::CredentialHandoff;
use crmlink::store::{run_store_cleanup, KeyValueStore, MemoryStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crmlink=info".into()),
        )
        .init();

    info!("crmlink starting...");

    // Server settings from optional TOML file, provider secrets from env
    let server_config = match std::env::var("CRMLINK_CONFIG") {
        Ok(path) => load_config(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path, e))?,
        Err(_) => ServerConfig::default(),
    };
    let provider = Arc::new(ProviderConfig::from_env().context("OAuth provider not configured")?);

    info!(
        bind_addr = %server_config.bind_addr,
        state_ttl = server_config.state_ttl_seconds,
        credentials_ttl = server_config.credentials_ttl_seconds,
        "Configuration loaded"
    );

    // Ephemeral store shared by state manager and credential handoff
    let memory_store = MemoryStore::new();
    let store: Arc<dyn KeyValueStore> = Arc::new(memory_store.clone());

    let state_manager = StateTokenManager::new(
        Arc::clone(&store),
        Duration::seconds(server_config.state_ttl_seconds),
    );
    let handoff = CredentialHandoff::new(
        Arc::clone(&store),
        Duration::seconds(server_config.credentials_ttl_seconds),
    );

    // Periodic sweep of expired state/credential entries
    tokio::spawn(run_store_cleanup(
        memory_store,
        server_config.cleanup_interval_seconds,
    ));

    let oauth_router = create_oauth_router(OAuthAppState {
        provider: Arc::clone(&provider),
        state_manager,
        handoff: handoff.clone(),
    });
    let integration_router = create_integration_router(IntegrationAppState {
        provider: Arc::clone(&provider),
        handoff,
    });

    let app = oauth_router
        .merge(integration_router)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", server_config.bind_addr))?;
    info!(addr = %server_config.bind_addr, "crmlink listening");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
