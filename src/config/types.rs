use std::fmt;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::logging::LoggingConfig;

/// Environment variables read verbatim into the top-level config.
const ENV_KEYS: [&str; 9] = [
    "APP_ENV",
    "BASE_URL",
    "WEB_BASE_URL",
    "PORT",
    "SPOTIFY_CLIENT_ID",
    "SPOTIFY_SECRET_KEY",
    "SPOTIFY_AUTHORIZE_URL",
    "SPOTIFY_TOKEN_URL",
    "SPOTIFY_SCOPES",
];

/// Errors raised while resolving the application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is missing")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("error loading configuration: {0}")]
    Figment(#[from] figment::Error),
}

/// Process-wide settings, loaded once at startup and read-only afterwards.
#[derive(Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub app_env: String,
    /// Public base URL of this service; the OAuth redirect URI hangs off it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base URL of the web client users are sent back to after login.
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub spotify_client_id: String,
    #[serde(default)]
    pub spotify_secret_key: String,
    #[serde(default = "default_authorize_url")]
    pub spotify_authorize_url: String,
    #[serde(default = "default_token_url")]
    pub spotify_token_url: String,
    /// Space separated list of requested permission scopes.
    #[serde(default = "default_scopes")]
    pub spotify_scopes: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Rejects configurations the service cannot run with.
    ///
    /// Blank credentials count as missing.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.spotify_client_id.trim().is_empty() {
            return Err(ConfigError::Missing("SPOTIFY_CLIENT_ID"));
        }
        if self.spotify_secret_key.trim().is_empty() {
            return Err(ConfigError::Missing("SPOTIFY_SECRET_KEY"));
        }

        for (name, value) in [
            ("BASE_URL", &self.base_url),
            ("WEB_BASE_URL", &self.web_base_url),
            ("SPOTIFY_AUTHORIZE_URL", &self.spotify_authorize_url),
            ("SPOTIFY_TOKEN_URL", &self.spotify_token_url),
        ] {
            Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{} '{}': {}", name, value, e)))?;
        }

        self.logging.level_filter()?;
        Ok(self)
    }

    /// The callback URI registered with Spotify. Used both in the authorize
    /// redirect and in the code exchange, so the two always match.
    pub fn redirect_uri(&self) -> String {
        format!("{}/oauth", self.base_url.trim_end_matches('/'))
    }

    /// Where the browser lands once tokens have been issued.
    pub fn web_return_url(&self) -> String {
        format!("{}/oauth", self.web_base_url.trim_end_matches('/'))
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("app_env", &self.app_env)
            .field("base_url", &self.base_url)
            .field("web_base_url", &self.web_base_url)
            .field("port", &self.port)
            .field("spotify_client_id", &self.spotify_client_id)
            .field("spotify_secret_key", &"[redacted]")
            .field("spotify_authorize_url", &self.spotify_authorize_url)
            .field("spotify_token_url", &self.spotify_token_url)
            .field("spotify_scopes", &self.spotify_scopes)
            .field("logging", &self.logging)
            .finish()
    }
}

/// The layered configuration sources: `./config.yaml`, then the process
/// environment (`LOG_*` variables land under `logging`).
pub fn figment() -> Figment {
    Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::raw().only(&ENV_KEYS))
        .merge(
            Env::prefixed("LOG_")
                .only(&["level", "format"])
                .map(|key| format!("logging.{}", key).into()),
        )
}

/// Loads `.env` into the process environment (existing variables win), then
/// resolves and validates the configuration.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_dotenv()?;
    load_config_from(figment())
}

/// Reads `.env` if there is one. A file that exists but does not parse is an
/// error.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Invalid(format!("could not read .env: {}", e))),
    }
}

/// Extracts and validates a config from an arbitrary figment.
pub fn load_config_from(figment: Figment) -> Result<AppConfig, ConfigError> {
    figment.extract::<AppConfig>()?.validate()
}

fn default_app_env() -> String {
    "local".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_web_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_authorize_url() -> String {
    "https://accounts.spotify.com/authorize".to_string()
}

fn default_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_scopes() -> String {
    "user-read-private".to_string()
}
