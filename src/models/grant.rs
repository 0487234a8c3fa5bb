use std::fmt;

use serde::{Deserialize, Serialize};

/// Tokens returned by Spotify when an authorization code is exchanged.
///
/// Never persisted: the access and refresh tokens are handed straight to the
/// browser as cookies.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: u64,
}

/// A fresh access token obtained with a refresh token.
///
/// Also the JSON body returned by `POST /refresh`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RefreshedGrant {
    pub access_token: String,
    pub expires_in: u64,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl fmt::Debug for RefreshedGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshedGrant")
            .field("access_token", &"[redacted]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_grant_decodes_spotify_payload() {
        let body = r#"{
            "access_token": "BQD-access",
            "token_type": "Bearer",
            "scope": "user-read-private",
            "expires_in": 3600,
            "refresh_token": "AQA-refresh"
        }"#;
        let grant: TokenGrant = serde_json::from_str(body).unwrap();
        assert_eq!(grant.access_token, "BQD-access");
        assert_eq!(grant.refresh_token, "AQA-refresh");
        assert_eq!(grant.token_type, "Bearer");
        assert_eq!(grant.expires_in, 3600);
    }

    #[test]
    fn refreshed_grant_ignores_extra_fields() {
        let body = r#"{"access_token": "new", "token_type": "Bearer", "scope": "", "expires_in": 3600}"#;
        let grant: RefreshedGrant = serde_json::from_str(body).unwrap();
        assert_eq!(
            grant,
            RefreshedGrant {
                access_token: "new".to_string(),
                expires_in: 3600,
            }
        );
    }

    #[test]
    fn debug_never_prints_tokens() {
        let grant = TokenGrant {
            access_token: "secret-access".to_string(),
            refresh_token: "secret-refresh".to_string(),
            scope: String::new(),
            token_type: "Bearer".to_string(),
            expires_in: 60,
        };
        let rendered = format!("{:?}", grant);
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
    }
}
