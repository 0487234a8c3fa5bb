use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::base::{OAuthError, OAuthProvider};
use crate::config::AppConfig;
use crate::models::{RefreshedGrant, TokenGrant};

/// Everything needed to talk to the Spotify accounts service.
#[derive(Clone)]
pub struct SpotifyProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
    pub scopes: String,
}

impl From<&AppConfig> for SpotifyProviderConfig {
    fn from(config: &AppConfig) -> Self {
        SpotifyProviderConfig {
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_secret_key.clone(),
            redirect_uri: config.redirect_uri(),
            authorize_url: config.spotify_authorize_url.clone(),
            token_url: config.spotify_token_url.clone(),
            scopes: config.spotify_scopes.clone(),
        }
    }
}

/// Authorization-code client for Spotify.
///
/// Both token calls authenticate with HTTP Basic (`client_id:client_secret`)
/// and send a form-encoded body. There is no timeout and no retry: a single
/// attempt per call.
pub struct SpotifyProvider {
    config: SpotifyProviderConfig,
    http: reqwest::Client,
}

impl SpotifyProvider {
    pub fn new(config: &SpotifyProviderConfig) -> Self {
        info!(
            "Creating SpotifyProvider with redirect_uri='{}', scopes='{}'",
            config.redirect_uri, config.scopes
        );
        Self {
            config: config.clone(),
            http: reqwest::Client::new(),
        }
    }

    async fn send_token_request<T: DeserializeOwned>(
        &self,
        grant_type: &str,
        form: &[(&str, &str)],
    ) -> Result<T, OAuthError> {
        debug!(
            event_name = "providers.spotify.token_request",
            event_domain = "providers",
            grant_type,
            "calling token endpoint"
        );

        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!(
                event_name = "providers.spotify.token_rejected",
                event_domain = "providers",
                grant_type,
                status = status.as_u16(),
                "token endpoint rejected the request"
            );
            return Err(OAuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| OAuthError::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl OAuthProvider for SpotifyProvider {
    fn get_name(&self) -> &str {
        "spotify"
    }

    fn authorize_url(&self, state: &str) -> Result<String, OAuthError> {
        let mut url = Url::parse(&self.config.authorize_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes)
            .append_pair("state", state);
        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, OAuthError> {
        self.send_token_request(
            "authorization_code",
            &[
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ],
        )
        .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedGrant, OAuthError> {
        self.send_token_request(
            "refresh_token",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
        )
        .await
    }
}
