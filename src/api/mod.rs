// HTTP API surface

pub mod integrations;
pub mod oauth;

pub use integrations::{create_integration_router, IntegrationAppState};
pub use oauth::{create_oauth_router, OAuthAppState, StateTokenManager};
