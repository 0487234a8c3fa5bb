//! Shared application state.
//!
//! Contains the state that is shared across all request handlers. Nothing in
//! it is mutable: everything about an individual login attempt lives in the
//! browser's cookies.

use crate::config::AppConfig;
use crate::providers::{create_provider, OAuthProvider};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<AppConfig>,
    /// The identity provider brokering the OAuth handshake.
    pub provider: Arc<dyn OAuthProvider>,
}

impl AppState {
    /// Builds the state with the provider described by `config`.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let provider = create_provider(&config);
        AppState { config, provider }
    }
}
