//! The browser-facing half of the OAuth handshake: `/login` and the `/oauth`
//! callback.
//!
//! One login attempt moves through
//! `NoState -> StatePending -> StateConsumed -> {TokensIssued | Rejected}`.
//! `/login` sets the state cookie (StatePending); the callback removes it
//! before looking at anything else (StateConsumed), so a state value can be
//! redeemed at most once.

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, warn};

use crate::errors::AuthError;
use crate::models::TokenGrant;
use crate::state::AppState;
use crate::utils::cookies::{
    add_cookie, remove_cookie, ACCESS_TOKEN_COOKIE, PLAYLIST_COOKIE, REFRESH_TOKEN_COOKIE,
    STATE_COOKIE,
};
use crate::utils::http_helpers::{first_query_values, found, HTTPError};
use crate::utils::random::state_token;

/// Registers the login and callback routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/oauth", get(oauth_callback))
}

struct LoginParams {
    playlist_id: Option<String>,
}

impl LoginParams {
    fn from_query(raw: Option<&str>) -> Self {
        let mut values = first_query_values(raw);
        LoginParams {
            playlist_id: values.remove("playlistId"),
        }
    }
}

struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

impl CallbackParams {
    fn from_query(raw: Option<&str>) -> Self {
        let mut values = first_query_values(raw);
        CallbackParams {
            code: values.remove("code"),
            state: values.remove("state"),
            error: values.remove("error"),
        }
    }
}

/// Redirects the browser to Spotify's consent page.
///
/// A fresh state token goes into the `spotify_auth_state` cookie and into the
/// authorization URL. An optional `playlistId` is parked in a second cookie so
/// the web client can resume a deep link after login; it is stored as-is.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Result<(CookieJar, Response), HTTPError> {
    let params = LoginParams::from_query(query.as_deref());
    let state_value = state_token();
    let auth_url = state.provider.authorize_url(&state_value).map_err(|e| {
        error!("Could not build {} authorize URL: {}", state.provider.get_name(), e);
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Could not build login URL")
    })?;

    let mut jar = add_cookie(jar, STATE_COOKIE, state_value);
    let playlist_id = params.playlist_id.filter(|id| !id.is_empty());
    let has_playlist = playlist_id.is_some();
    if let Some(id) = playlist_id {
        jar = add_cookie(jar, PLAYLIST_COOKIE, id);
    }

    info!(
        event_name = "auth.login.redirect",
        event_domain = "auth",
        provider = state.provider.get_name(),
        has_playlist,
        "redirecting to provider login"
    );
    Ok((jar, found(&auth_url)))
}

/// Spotify sends the browser back here with `code` and `state`.
///
/// The state cookie is cleared on every path past its lookup, including the
/// failure ones. The query is only read after that.
async fn oauth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let expected_state = match jar.get(STATE_COOKIE).map(|c| c.value().to_string()) {
        Some(value) if !value.is_empty() => value,
        _ => return reject(AuthError::InvalidState).into_response(),
    };
    let jar = remove_cookie(jar, STATE_COOKIE);
    let params = CallbackParams::from_query(query.as_deref());

    match complete_authorization(&state, &expected_state, params).await {
        Ok(grant) => {
            let jar = add_cookie(jar, ACCESS_TOKEN_COOKIE, grant.access_token);
            let jar = add_cookie(jar, REFRESH_TOKEN_COOKIE, grant.refresh_token);
            info!(
                event_name = "auth.callback.tokens_issued",
                event_domain = "auth",
                expires_in = grant.expires_in,
                "tokens issued, returning to web client"
            );
            (jar, found(&state.config.web_return_url())).into_response()
        }
        Err(err) => (jar, reject(err)).into_response(),
    }
}

async fn complete_authorization(
    state: &AppState,
    expected_state: &str,
    params: CallbackParams,
) -> Result<TokenGrant, AuthError> {
    if params.state.as_deref() != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }
    if let Some(reason) = params.error {
        return Err(AuthError::AuthorizationDenied(reason));
    }
    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AuthError::BadRequest("Authorization code not found".to_string()))?;

    state
        .provider
        .exchange_code(&code)
        .await
        .map_err(AuthError::ExchangeFailed)
}

fn reject(err: AuthError) -> AuthError {
    warn!(
        event_name = "auth.callback.rejected",
        event_domain = "auth",
        reason = err.kind(),
        "oauth callback rejected"
    );
    err
}
