//! Health check endpoints.

use crate::state::AppState;
use axum::{response::IntoResponse, routing::get, Router};
use tracing::debug;

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/alive", get(alive))
}

/// Liveness probe. Always answers 200 `ok`.
async fn alive() -> impl IntoResponse {
    debug!("alive");
    "ok"
}
