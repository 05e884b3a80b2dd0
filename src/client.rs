use serde_json::Value;

use crate::config::Credentials;
use crate::error::ChirpError;
use crate::oauth::pkce::{generate_authorization_request, AuthorizationRequest};
use crate::oauth::query::{form_encode, query_param};
use crate::oauth::token::{RefreshRotation, TokenKind, TokenResponse, TokenSet};
use crate::post::{PostBuilder, PostPayload, PostResponse};

pub const DEFAULT_SCOPES: &[&str] = &["tweet.read", "users.read"];
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost/";
const OFFLINE_ACCESS_SCOPE: &str = "offline.access";

/// The provider's OAuth2 and posting endpoints.
///
/// `Default` points at the real provider; [`Endpoints::with_base`] rewrites
/// every endpoint onto an alternate host, which is how the test suite points
/// a client at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub revoke_url: String,
    pub posts_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorize_url: "https://twitter.com/i/oauth2/authorize".into(),
            token_url: "https://api.twitter.com/2/oauth2/token".into(),
            revoke_url: "https://api.twitter.com/2/oauth2/revoke".into(),
            posts_url: "https://api.twitter.com/2/tweets".into(),
        }
    }
}

impl Endpoints {
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            authorize_url: format!("{base}/i/oauth2/authorize"),
            token_url: format!("{base}/2/oauth2/token"),
            revoke_url: format!("{base}/2/oauth2/revoke"),
            posts_url: format!("{base}/2/tweets"),
        }
    }
}

/// OAuth2 client for one user session.
///
/// Holds the client identity, the pending authorization handshake, and the
/// currently issued tokens. Every operation issues at most one HTTP request
/// and returns once the response is in; there is no retry policy and no
/// internal locking. Token-mutating operations take `&mut self`, so a
/// session cannot be shared across tasks without external synchronization.
pub struct Client {
    credentials: Credentials,
    scopes: Vec<String>,
    redirect_uri: String,
    endpoints: Endpoints,
    rotation: RefreshRotation,
    http: reqwest::Client,
    pending: Option<AuthorizationRequest>,
    tokens: TokenSet,
}

impl Client {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            endpoints: Endpoints::default(),
            rotation: RefreshRotation::default(),
            http: reqwest::Client::new(),
            pending: None,
            tokens: TokenSet::default(),
        }
    }

    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn refresh_rotation(mut self, rotation: RefreshRotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn tokens(&self) -> &TokenSet {
        &self.tokens
    }

    /// Install tokens obtained elsewhere, e.g. handed in by a caller that
    /// stores them between runs.
    pub fn set_tokens(&mut self, tokens: TokenSet) {
        self.tokens = tokens;
    }

    pub fn set_redirect_uri(&mut self, uri: impl Into<String>) {
        self.redirect_uri = uri.into();
    }

    /// Build the browser authorization URL, generating a fresh
    /// challenge/state pair.
    ///
    /// Overwrites any pending handshake, so an authorization already in
    /// flight can no longer be exchanged.
    pub fn authorization_url(&mut self) -> String {
        let request = generate_authorization_request();
        let query = form_encode(&[
            ("response_type", "code"),
            ("client_id", &self.credentials.client_id),
            ("redirect_uri", &self.redirect_uri),
            ("scope", &self.scopes.join(" ")),
            ("state", &request.state),
            ("code_challenge", &request.code_challenge),
            ("code_challenge_method", "plain"),
        ]);
        let url = format!("{}?{}", self.endpoints.authorize_url, query);
        self.pending = Some(request);
        url
    }

    /// Exchange the authorization code carried in `callback_url` for tokens.
    ///
    /// The code is looked up by key in the callback query string, wherever
    /// the provider put it. On success the access token (and, when
    /// "offline.access" was requested, the refresh token) is stored.
    pub async fn exchange_code(&mut self, callback_url: &str) -> Result<TokenResponse, ChirpError> {
        let pending = self
            .pending
            .as_ref()
            .ok_or(ChirpError::AuthorizationNotStarted)?;
        // Plain PKCE transform: the verifier is the challenge itself.
        let verifier = pending.code_challenge.clone();
        let code = query_param(callback_url, "code").ok_or_else(|| {
            ChirpError::Callback("no `code` parameter in callback URL".to_string())
        })?;

        let request = self
            .http
            .post(&self.endpoints.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("code_verifier", verifier.as_str()),
            ]);
        let body = self.execute(request).await?;
        let response: TokenResponse = serde_json::from_value(body)?;

        self.tokens.access_token = Some(response.access_token.clone());
        self.tokens.expires_at = response.expires_at();
        if self.offline_access_requested() {
            self.tokens.refresh_token = response.refresh_token.clone();
        }
        self.pending = None;
        Ok(response)
    }

    /// Obtain a new access token using the stored refresh token.
    ///
    /// Fails with [`ChirpError::NoRefreshToken`] before any I/O when no
    /// refresh token is held. Whether a replacement refresh token from the
    /// response is adopted is governed by [`RefreshRotation`].
    pub async fn refresh(&mut self) -> Result<TokenResponse, ChirpError> {
        let refresh_token = self
            .tokens
            .refresh_token
            .clone()
            .ok_or(ChirpError::NoRefreshToken)?;

        let request = self
            .http
            .post(&self.endpoints.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
            ]);
        let body = self.execute(request).await?;
        let response: TokenResponse = serde_json::from_value(body)?;

        self.tokens.access_token = Some(response.access_token.clone());
        self.tokens.expires_at = response.expires_at();
        if self.rotation == RefreshRotation::Rotate {
            if let Some(rotated) = &response.refresh_token {
                self.tokens.refresh_token = Some(rotated.clone());
            }
        }
        Ok(response)
    }

    /// Revoke the selected token, then the other one if still held.
    ///
    /// A single call can therefore clear both tokens; callers needing only
    /// one revoked should be aware of the cascade. Each step is its own
    /// request and clears its token only once the provider accepted the
    /// revocation.
    pub async fn revoke(&mut self, kind: TokenKind) -> Result<(), ChirpError> {
        self.revoke_one(kind).await?;
        self.revoke_one(kind.other()).await?;
        Ok(())
    }

    async fn revoke_one(&mut self, kind: TokenKind) -> Result<(), ChirpError> {
        let token = match kind {
            TokenKind::Access => self.tokens.access_token.clone(),
            TokenKind::Refresh => self.tokens.refresh_token.clone(),
        };
        let Some(token) = token else {
            return Ok(());
        };

        let request = self
            .http
            .post(&self.endpoints.revoke_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[
                ("token", token.as_str()),
                ("token_type_hint", kind.type_hint()),
                ("client_id", self.credentials.client_id.as_str()),
            ]);
        self.execute(request).await?;

        match kind {
            TokenKind::Access => {
                self.tokens.access_token = None;
                self.tokens.expires_at = None;
            }
            TokenKind::Refresh => self.tokens.refresh_token = None,
        }
        tracing::debug!("revoked {} token", kind.type_hint());
        Ok(())
    }

    /// Post a plain-text status update.
    pub async fn post_status(&self, text: &str) -> Result<PostResponse, ChirpError> {
        self.post().text(text).send().await
    }

    /// Start building a status update with optional fields.
    pub fn post(&self) -> PostBuilder<'_> {
        PostBuilder::new(self)
    }

    pub(crate) async fn send_post(&self, payload: &PostPayload) -> Result<PostResponse, ChirpError> {
        let access_token = self
            .tokens
            .access_token
            .as_deref()
            .ok_or(ChirpError::NotAuthenticated)?;

        let request = self
            .http
            .post(&self.endpoints.posts_url)
            .bearer_auth(access_token)
            .json(payload);
        let body = self.execute(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// The one request executor every operation funnels through: send, check
    /// the status against the provider's success pair {200, 201}, and hand
    /// back the parsed body or a typed rejection.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, ChirpError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text));

        tracing::debug!(status, "provider response");
        if matches!(status, 200 | 201) {
            Ok(body)
        } else {
            Err(ChirpError::Api { status, body })
        }
    }

    fn offline_access_requested(&self) -> bool {
        self.scopes.iter().any(|s| s == OFFLINE_ACCESS_SCOPE)
    }
}
