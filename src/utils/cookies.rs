//! Short-lived, unsigned cookies carrying the OAuth handshake between requests.
//!
//! The browser's cookie jar is the only session store: nothing about a login
//! attempt is kept server-side. Cookies carry no `Secure`, `HttpOnly` or
//! `SameSite` attributes.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::{Duration, OffsetDateTime};

pub const STATE_COOKIE: &str = "spotify_auth_state";
pub const PLAYLIST_COOKIE: &str = "spotify_playlist_id";
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Every cookie we set expires this long after it was issued.
pub const COOKIE_LIFETIME: Duration = Duration::minutes(10);

/// Builds a cookie expiring [`COOKIE_LIFETIME`] from now.
pub fn build_cookie(name: &str, value: impl Into<String>) -> Cookie<'static> {
    Cookie::build((name.to_string(), value.into()))
        .path("/")
        .expires(OffsetDateTime::now_utc() + COOKIE_LIFETIME)
        .build()
}

pub fn add_cookie(jar: CookieJar, name: &str, value: impl Into<String>) -> CookieJar {
    jar.add(build_cookie(name, value))
}

/// Queues a removal cookie (empty value, `Max-Age=0`) for `name`.
pub fn remove_cookie(jar: CookieJar, name: &str) -> CookieJar {
    jar.remove(Cookie::build((name.to_string(), "")).path("/").build())
}
