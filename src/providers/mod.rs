pub mod base;
pub mod spotify_provider;

pub use base::{create_provider, OAuthError, OAuthProvider};
pub use spotify_provider::{SpotifyProvider, SpotifyProviderConfig};
