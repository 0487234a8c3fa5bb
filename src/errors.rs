//! Failures of the OAuth handshake as seen by the browser.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::providers::OAuthError;
use crate::utils::http_helpers::HTTPError;

/// Every variant is terminal for the login attempt; the client restarts at
/// `/login`. All of them answer `400 Bad Request` with the display text as a
/// plain text body.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No state cookie came back with the callback.
    #[error("State not found")]
    InvalidState,

    /// The `state` query parameter differs from the state cookie.
    #[error("State value mismatch")]
    StateMismatch,

    /// The user (or Spotify) declined the authorization request.
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("{0}")]
    ExchangeFailed(#[source] OAuthError),

    #[error("{0}")]
    RefreshFailed(#[source] OAuthError),

    #[error("{0}")]
    BadRequest(String),
}

impl AuthError {
    /// Short machine-readable name, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidState => "invalid_state",
            AuthError::StateMismatch => "state_mismatch",
            AuthError::AuthorizationDenied(_) => "authorization_denied",
            AuthError::ExchangeFailed(_) => "exchange_failed",
            AuthError::RefreshFailed(_) => "refresh_failed",
            AuthError::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        HTTPError::bad_request(self.to_string()).into_response()
    }
}
