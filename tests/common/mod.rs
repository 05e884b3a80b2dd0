use chirp::{Client, Credentials, Endpoints};

pub const CLIENT_ID: &str = "client-123";
pub const CLIENT_SECRET: &str = "hunter2";

/// Build a client whose endpoints all point at a mock server.
#[allow(dead_code)]
pub fn test_client(base: &str, scopes: &[&str]) -> Client {
    Client::new(Credentials {
        client_id: CLIENT_ID.into(),
        client_secret: CLIENT_SECRET.into(),
    })
    .scopes(scopes.iter().copied())
    .endpoints(Endpoints::with_base(base))
}
