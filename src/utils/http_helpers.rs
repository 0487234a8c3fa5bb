use std::collections::HashMap;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
///
/// The message is sent back as a plain text body.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        HTTPError::new(StatusCode::BAD_REQUEST, message)
    }
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

/// A `302 Found` redirect to `location`.
/// axum's `Redirect` has no 302 constructor.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Decodes a raw query string into its parameters.
///
/// A repeated key keeps its first value; no query decodes to an empty map.
pub fn first_query_values(raw: Option<&str>) -> HashMap<String, String> {
    let mut values = HashMap::new();
    if let Some(raw) = raw {
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            values
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn http_error_is_plain_text() {
        let response = HTTPError::bad_request("State not found").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"State not found");
    }

    #[test]
    fn found_sets_location() {
        let response = found("https://accounts.spotify.com/authorize?state=x");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://accounts.spotify.com/authorize?state=x"
        );
    }

    #[test]
    fn repeated_query_keys_keep_first_value() {
        let values = first_query_values(Some("state=first&code=c%20d&state=second"));
        assert_eq!(values.get("state").map(String::as_str), Some("first"));
        assert_eq!(values.get("code").map(String::as_str), Some("c d"));
        assert!(first_query_values(None).is_empty());
    }
}
