use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the anti-CSRF state token handed out at `/login`.
pub const STATE_TOKEN_LEN: usize = 50;

/// Random alphanumeric string drawn from the thread-local CSPRNG.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// A fresh state token for one login attempt.
pub fn state_token() -> String {
    random_string(STATE_TOKEN_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_token_is_fixed_length_alphanumeric() {
        let token = state_token();
        assert_eq!(token.len(), STATE_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        assert_ne!(state_token(), state_token());
    }
}
