#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use axum_extra::extract::cookie::Cookie;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use goodvibes_server::config::{load_config_from, AppConfig};
use goodvibes_server::routes::create_router;
use goodvibes_server::state::AppState;

pub const WEB_BASE_URL: &str = "http://localhost:3000";

/// A valid configuration whose token endpoint points at `token_url`.
pub fn load_test_config(token_url: &str) -> AppConfig {
    let yaml = format!(
        r#"
app_env: "test"
base_url: "http://localhost:3001"
web_base_url: "{WEB_BASE_URL}"
port: 3001
spotify_client_id: "client-id"
spotify_secret_key: "client-secret"
spotify_token_url: "{token_url}"
logging:
  level: "debug"
  format: "console"
"#
    );
    load_config_from(Figment::new().merge(Yaml::string(&yaml)))
        .expect("Failed to parse test config YAML")
}

pub fn build_app(config: AppConfig) -> Router {
    create_router(AppState::new(Arc::new(config)))
}

pub fn request(method: Method, path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub fn json_request(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

/// All cookies set by `response`, parsed.
pub fn set_cookies(response: &Response<Body>) -> Vec<Cookie<'static>> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| {
            let raw = value.to_str().expect("Set-Cookie not valid UTF-8");
            Cookie::parse(raw.to_string()).expect("Set-Cookie should parse")
        })
        .collect()
}

pub fn find_cookie(response: &Response<Body>, name: &str) -> Option<Cookie<'static>> {
    set_cookies(response).into_iter().find(|c| c.name() == name)
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header missing")
        .to_str()
        .expect("Location header not valid UTF-8")
        .to_string()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body not valid UTF-8")
}
