use rand::distr::Alphanumeric;
use rand::RngExt;

/// Challenge and state length the provider accepts for the "plain" method.
pub const CHALLENGE_LEN: usize = 20;

/// Pending authorization handshake state.
///
/// With the "plain" PKCE transform the challenge doubles as the verifier, so
/// only one value is kept. `state` is the anti-CSRF parameter echoed back in
/// the callback; this client sends it but does not verify the echo.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub code_challenge: String,
    pub state: String,
}

pub fn generate_authorization_request() -> AuthorizationRequest {
    AuthorizationRequest {
        code_challenge: random_token(CHALLENGE_LEN),
        state: random_token(CHALLENGE_LEN),
    }
}

fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
