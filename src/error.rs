//! Failure taxonomy for the OAuth flow and item aggregation.
//!
//! Every variant is terminal for the current request; nothing is retried
//! internally. Upstream HTTP failures carry the upstream status and body in
//! the detail string rather than being re-thrown raw.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the integration components.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// Provider redirected back with an `error` parameter.
    #[error("authorization denied by provider: {0}")]
    ProviderDenied(String),

    /// The `state` query parameter is missing or not decodable.
    #[error("invalid state format")]
    MalformedState,

    /// Decoded state does not match the stored envelope (or none is stored).
    #[error("state does not match")]
    StateMismatch,

    /// Code-for-token exchange failed (transport, non-2xx, or bad body).
    #[error("token exchange failed: {detail}")]
    TokenExchangeFailed {
        status: Option<u16>,
        detail: String,
    },

    /// No credentials stored for this user/org (or already consumed).
    #[error("no credentials found")]
    NotFound,

    /// Stored credentials are not parseable as a credential record.
    #[error("invalid credentials format")]
    InvalidFormat,

    /// Credential record carries no usable access token.
    #[error("access token not found")]
    MissingAccessToken,

    /// A collection fetch against the provider's object API failed.
    #[error("failed to fetch {collection}: {detail}")]
    UpstreamFetchFailed {
        collection: String,
        detail: String,
    },

    /// Key-value store backend failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization or other internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntegrationError {
    /// HTTP status for this failure kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntegrationError::NotFound => StatusCode::NOT_FOUND,
            IntegrationError::Store(_) | IntegrationError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for IntegrationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            IntegrationError::ProviderDenied("denied".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IntegrationError::MalformedState.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IntegrationError::StateMismatch.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IntegrationError::NotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            IntegrationError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_exchange_failure_detail_preserved() {
        let err = IntegrationError::TokenExchangeFailed {
            status: Some(401),
            detail: "401 Unauthorized: bad client secret".to_string(),
        };
        assert!(err.to_string().contains("bad client secret"));
    }
}
