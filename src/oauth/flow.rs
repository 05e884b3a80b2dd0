use std::time::Duration;

use crate::client::Client;
use crate::error::ChirpError;
use crate::oauth::callback::listen_for_callback;
use crate::oauth::token::TokenResponse;

/// Run the full browser login flow against a local callback listener.
///
/// Rebinds the client's redirect URI to `http://localhost:{port}/`, opens
/// the authorization URL in the system browser, waits for the provider
/// redirect, and exchanges the code it carries.
pub async fn run_login_flow(
    client: &mut Client,
    port: u16,
    timeout: Duration,
) -> Result<TokenResponse, ChirpError> {
    client.set_redirect_uri(format!("http://localhost:{port}/"));
    let auth_url = client.authorization_url();

    if webbrowser::open(&auth_url).is_err() {
        tracing::warn!("could not open browser automatically; please visit:\n{auth_url}");
    }

    let callback_url = listen_for_callback(port, timeout).await?;
    client.exchange_code(&callback_url).await
}
