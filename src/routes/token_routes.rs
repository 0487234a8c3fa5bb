//! Access token refresh.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{routing::post, Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AuthError;
use crate::models::RefreshedGrant;
use crate::state::AppState;

/// Registers token management routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/refresh", post(refresh))
}

#[derive(Deserialize)]
struct RefreshRequest {
    token: String,
}

/// Trades a refresh token for a new access token.
///
/// The body is validated before Spotify is contacted. The new grant is
/// returned to the caller and kept nowhere else.
async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<RefreshedGrant>, AuthError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(
            event_name = "auth.refresh.bad_request",
            event_domain = "auth",
            "refresh body rejected: {}",
            rejection.body_text()
        );
        AuthError::BadRequest(rejection.body_text())
    })?;

    let grant = state
        .provider
        .refresh_token(&request.token)
        .await
        .map_err(|e| {
            warn!(
                event_name = "auth.refresh.failed",
                event_domain = "auth",
                provider = state.provider.get_name(),
                "token refresh failed"
            );
            AuthError::RefreshFailed(e)
        })?;

    info!(
        event_name = "auth.refresh.succeeded",
        event_domain = "auth",
        expires_in = grant.expires_in,
        "access token refreshed"
    );
    Ok(Json(grant))
}
