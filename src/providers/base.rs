use std::sync::Arc;

use thiserror::Error;

use super::spotify_provider::{SpotifyProvider, SpotifyProviderConfig};
use crate::config::AppConfig;
use crate::models::{RefreshedGrant, TokenGrant};

/// Failures talking to the identity provider.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint answered with something other than 200. The body is
    /// surfaced verbatim, without trying to interpret the provider's payload.
    #[error("{body}")]
    Rejected { status: u16, body: String },

    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// An OAuth 2.0 authorization-code provider: builds the browser redirect and
/// performs the two server-to-server token calls.
#[async_trait::async_trait]
pub trait OAuthProvider: Send + Sync {
    fn get_name(&self) -> &str;

    /// Authorization URL embedding `state`, ready to redirect a browser to.
    fn authorize_url(&self, state: &str) -> Result<String, OAuthError>;

    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, OAuthError>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedGrant, OAuthError>;
}

/// Create the identity provider from the application config.
pub fn create_provider(config: &AppConfig) -> Arc<dyn OAuthProvider> {
    Arc::new(SpotifyProvider::new(&SpotifyProviderConfig::from(config)))
}
