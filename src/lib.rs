pub mod client;
pub mod config;
pub mod error;
pub mod oauth;
pub mod post;

pub use client::{Client, Endpoints, DEFAULT_REDIRECT_URI, DEFAULT_SCOPES};
pub use config::{load_credentials, Credentials, CredentialsFile};
pub use error::ChirpError;
pub use oauth::flow::run_login_flow;
pub use oauth::token::{RefreshRotation, TokenKind, TokenResponse, TokenSet};
pub use post::{PostBuilder, PostResponse};

/// One-shot convenience: post a status with an access token obtained
/// elsewhere.
pub async fn post_once(
    credentials: Credentials,
    access_token: &str,
    text: &str,
) -> Result<PostResponse, ChirpError> {
    let mut client = Client::new(credentials);
    client.set_tokens(TokenSet {
        access_token: Some(access_token.to_string()),
        ..TokenSet::default()
    });
    client.post_status(text).await
}
