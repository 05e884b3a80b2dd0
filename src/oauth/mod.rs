pub mod callback;
pub mod flow;
pub mod pkce;
pub mod query;
pub mod token;

pub use callback::listen_for_callback;
pub use flow::run_login_flow;
pub use pkce::{generate_authorization_request, AuthorizationRequest};
pub use token::{RefreshRotation, TokenKind, TokenResponse, TokenSet};
