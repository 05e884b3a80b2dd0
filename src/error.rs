use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ChirpError {
    #[error("API request failed with status {status}: {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },

    #[error("no refresh token held; request the \"offline.access\" scope and log in again")]
    NoRefreshToken,

    #[error("no access token held; complete the authorization flow first")]
    NotAuthenticated,

    #[error("no authorization in flight; build an authorization URL before exchanging a code")]
    AuthorizationNotStarted,

    #[error("callback error: {0}")]
    Callback(String),

    #[error("error in credentials file {}: {detail}", path.display())]
    Credentials { path: PathBuf, detail: String },

    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChirpError {
    /// Error code string for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            ChirpError::Api { .. } => "api_error",
            ChirpError::NoRefreshToken => "no_refresh_token",
            ChirpError::NotAuthenticated => "not_authenticated",
            ChirpError::AuthorizationNotStarted => "authorization_not_started",
            ChirpError::Callback(_) => "callback_error",
            ChirpError::Credentials { .. } => "credentials_error",
            ChirpError::Decode(_) => "decode_error",
            ChirpError::Transport(_) => "transport_error",
            ChirpError::Io(_) => "io_error",
        }
    }

    /// HTTP status of an API rejection, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ChirpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
