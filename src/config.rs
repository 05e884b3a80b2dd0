use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ChirpError;

/// OAuth2 client identity, fixed for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// On-disk credentials file: the client identity plus optional overrides for
/// the scope list and redirect URI.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsFile {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

impl CredentialsFile {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }
}

/// Default credentials location under the home directory.
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chirp")
        .join("credentials.json")
}

/// Load credentials from an explicit path, or discover them: a
/// `credentials.json` in the working directory wins over the home-directory
/// default.
pub fn load_credentials(path: Option<&Path>) -> Result<CredentialsFile, ChirpError> {
    let path = match path {
        Some(explicit) => explicit.to_path_buf(),
        None => {
            let local = PathBuf::from("credentials.json");
            if local.exists() {
                local
            } else {
                default_path()
            }
        }
    };

    let data = std::fs::read_to_string(&path).map_err(|e| ChirpError::Credentials {
        path: path.clone(),
        detail: e.to_string(),
    })?;
    let file: CredentialsFile =
        serde_json::from_str(&data).map_err(|e| ChirpError::Credentials {
            path: path.clone(),
            detail: e.to_string(),
        })?;

    if file.client_id.is_empty() || file.client_secret.is_empty() {
        return Err(ChirpError::Credentials {
            path,
            detail: "client_id and client_secret must be non-empty".into(),
        });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_minimal_credentials() {
        let file = write_file(r#"{"client_id": "id-1", "client_secret": "hunter2"}"#);
        let creds = load_credentials(Some(file.path())).unwrap();
        assert_eq!(creds.client_id, "id-1");
        assert_eq!(creds.client_secret, "hunter2");
        assert!(creds.scopes.is_none());
        assert!(creds.redirect_uri.is_none());
    }

    #[test]
    fn load_credentials_with_overrides() {
        let file = write_file(
            r#"{
                "client_id": "id-1",
                "client_secret": "hunter2",
                "scopes": ["tweet.read", "tweet.write", "offline.access"],
                "redirect_uri": "http://localhost:3000/"
            }"#,
        );
        let creds = load_credentials(Some(file.path())).unwrap();
        assert_eq!(
            creds.scopes.as_deref(),
            Some(&["tweet.read".to_string(), "tweet.write".into(), "offline.access".into()][..])
        );
        assert_eq!(creds.redirect_uri.as_deref(), Some("http://localhost:3000/"));
    }

    #[test]
    fn missing_file_is_a_credentials_error() {
        let err = load_credentials(Some(Path::new("/nonexistent/credentials.json"))).unwrap_err();
        assert!(matches!(err, ChirpError::Credentials { .. }));
        assert!(err.to_string().contains("/nonexistent/credentials.json"));
    }

    #[test]
    fn invalid_json_is_a_credentials_error() {
        let file = write_file("{not json");
        let err = load_credentials(Some(file.path())).unwrap_err();
        assert!(matches!(err, ChirpError::Credentials { .. }));
    }

    #[test]
    fn empty_identity_is_rejected() {
        let file = write_file(r#"{"client_id": "", "client_secret": "s"}"#);
        let err = load_credentials(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn default_path_structure() {
        let path = default_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains(".chirp"));
        assert!(path_str.ends_with("credentials.json"));
    }
}
