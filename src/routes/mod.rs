//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups: the OAuth
//! login/callback pair, token refresh, and health checks. The whole table is
//! wrapped in access logging and CORS.

mod health_routes;
mod oauth_routes;
mod token_routes;

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, Method, Request};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info_span, Level};
use url::Url;

use crate::config::AppConfig;
use crate::state::AppState;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches
/// the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Only the path is recorded: query strings carry authorization codes.
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    Router::new()
        .merge(oauth_routes::routes())
        .merge(token_routes::routes())
        .merge(health_routes::routes())
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}

/// CORS policy admitting the web client and this service's own origin.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = [&config.web_base_url, &config.base_url]
        .into_iter()
        .filter_map(|base| Url::parse(base).ok())
        .filter_map(|url| HeaderValue::from_str(&url.origin().ascii_serialization()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
}
