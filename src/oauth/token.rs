use serde::{Deserialize, Serialize};

/// Tokens currently held for the session.
///
/// Mutated in place by the client after every token-issuing call and cleared
/// field-wise on revocation. The refresh token is only ever populated when
/// the "offline.access" scope was requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl TokenSet {
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => chrono::Utc::now() >= expires,
            None => false,
        }
    }
}

/// Raw token response from the provider's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    pub(crate) fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.expires_in
            .map(|secs| chrono::Utc::now() + chrono::Duration::seconds(secs))
    }
}

/// Which of the two held tokens an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// The `token_type_hint` value the revoke endpoint expects.
    pub fn type_hint(self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }

    pub(crate) fn other(self) -> Self {
        match self {
            TokenKind::Access => TokenKind::Refresh,
            TokenKind::Refresh => TokenKind::Access,
        }
    }
}

/// Whether a refresh response may replace the stored refresh token.
///
/// Providers differ on rotating refresh tokens; this makes the behavior a
/// configuration choice instead of an assumption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshRotation {
    /// Adopt a replacement refresh token when the response carries one.
    #[default]
    Rotate,
    /// Keep the original refresh token even if the response carries a new one.
    Keep,
}
