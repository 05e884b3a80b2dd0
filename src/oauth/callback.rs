use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::ChirpError;
use crate::oauth::query::query_param;

/// Wait for a single provider redirect on `localhost:{port}` and return the
/// full callback URL, query string included.
///
/// The listener answers one request with a small HTML page and shuts down.
/// A callback carrying an `error` parameter (e.g. the user denied the
/// authorization) is surfaced as [`ChirpError::Callback`].
pub async fn listen_for_callback(port: u16, timeout: Duration) -> Result<String, ChirpError> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;

    let accept_future = async {
        let (mut stream, _) = listener.accept().await?;

        let mut buf = vec![0u8; 4096];
        let n = stream.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..n]);

        let path = parse_request_path(&request).ok_or_else(|| {
            ChirpError::Callback("malformed callback request".to_string())
        })?;
        let callback_url = format!("http://localhost:{port}{path}");

        let body = "<!DOCTYPE html><html><body><h1>Authorized!</h1>\
                     <p>You can close this window and return to the terminal.</p></body></html>";
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await?;
        stream.shutdown().await?;

        if let Some(error) = query_param(&callback_url, "error") {
            return Err(ChirpError::Callback(format!(
                "authorization was not granted: {error}"
            )));
        }

        tracing::debug!("received OAuth callback: {callback_url}");
        Ok::<String, ChirpError>(callback_url)
    };

    tokio::time::timeout(timeout, accept_future)
        .await
        .map_err(|_| {
            ChirpError::Callback(format!(
                "timed out waiting for OAuth callback after {}s",
                timeout.as_secs()
            ))
        })?
}

/// Extract the request path from `GET /?state=...&code=... HTTP/1.1`.
fn parse_request_path(request: &str) -> Option<&str> {
    let first_line = request.lines().next()?;
    let mut parts = first_line.split_whitespace();
    if parts.next()? != "GET" {
        return None;
    }
    let path = parts.next()?;
    path.starts_with('/').then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_path_from_valid_request() {
        let request = "GET /?state=abc&code=XYZ123 HTTP/1.1\r\nHost: localhost\r\n";
        assert_eq!(parse_request_path(request), Some("/?state=abc&code=XYZ123"));
    }

    #[test]
    fn parse_path_rejects_non_get() {
        let request = "POST / HTTP/1.1\r\nHost: localhost\r\n";
        assert_eq!(parse_request_path(request), None);
    }

    #[test]
    fn parse_path_rejects_garbage() {
        assert_eq!(parse_request_path(""), None);
        assert_eq!(parse_request_path("GET"), None);
        assert_eq!(parse_request_path("GET nonsense HTTP/1.1"), None);
    }

    #[tokio::test]
    async fn listener_returns_full_callback_url() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let server = tokio::spawn(listen_for_callback(port, Duration::from_secs(5)));

        // Give the listener a moment to bind before connecting.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut stream = tokio::net::TcpStream::connect(("127.0.0.1", port))
            .await
            .unwrap();
        stream
            .write_all(b"GET /?state=abc&code=XYZ123 HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.contains("Authorized!"));

        let callback_url = server.await.unwrap().unwrap();
        assert_eq!(
            callback_url,
            format!("http://localhost:{port}/?state=abc&code=XYZ123")
        );
    }

    #[tokio::test]
    async fn listener_surfaces_denied_authorization() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let server = tokio::spawn(listen_for_callback(port, Duration::from_secs(5)));

        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut stream = tokio::net::TcpStream::connect(("127.0.0.1", port))
            .await
            .unwrap();
        stream
            .write_all(b"GET /?error=access_denied&state=abc HTTP/1.1\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        let err = server.await.unwrap().unwrap_err();
        assert!(matches!(err, ChirpError::Callback(_)));
        assert!(err.to_string().contains("access_denied"));
    }

    #[tokio::test]
    async fn listener_times_out_without_callback() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = listen_for_callback(port, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, ChirpError::Callback(_)));
        assert!(err.to_string().contains("timed out"));
    }
}
