//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including the identity provider client and route setup.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// Binds to `0.0.0.0:{port}` and serves until the process is stopped.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the specified address
/// or encounters a runtime error during execution.
pub async fn run(config: Arc<AppConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config.clone());
    let app = routes::create_router(state);

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address).await?;

    info!(
        "Starting server on {} (env '{}', public URL {})",
        bind_address, config.app_env, config.base_url
    );

    axum::serve(listener, app).await?;

    Ok(())
}
