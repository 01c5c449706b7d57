//! Service-account key file loading.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to read key file {path:?}: {cause}")]
    FailedToRead {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("failed to parse key file {path:?}: {cause}")]
    FailedToParse {
        path: PathBuf,
        cause: serde_json::Error,
    },
    #[error("key file {path:?} has an empty {name:?}")]
    MissingPropertyValue { path: PathBuf, name: String },
}

/// The identity and private key of a service account, as found in its JSON key file.
#[derive(Clone, Deserialize)]
pub struct ServiceCredential {
    client_email: String,
    private_key: String,
    #[serde(default)]
    token_uri: Option<String>,
}

impl ServiceCredential {
    pub fn new(client_email: String, private_key: String) -> ServiceCredential {
        ServiceCredential {
            client_email,
            private_key,
            token_uri: None,
        }
    }

    pub fn load_from_file(path: &Path) -> Result<ServiceCredential, CredentialError> {
        debug!("Loading service account key from {:?}...", path);

        let contents = fs::read_to_string(path).map_err(|cause| CredentialError::FailedToRead {
            path: path.to_path_buf(),
            cause,
        })?;

        let credential: ServiceCredential =
            serde_json::from_str(&contents).map_err(|cause| CredentialError::FailedToParse {
                path: path.to_path_buf(),
                cause,
            })?;

        for (name, value) in [
            ("client_email", &credential.client_email),
            ("private_key", &credential.private_key),
        ] {
            if value.trim().is_empty() {
                return Err(CredentialError::MissingPropertyValue {
                    path: path.to_path_buf(),
                    name: name.to_string(),
                });
            }
        }

        Ok(credential)
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn token_uri(&self) -> Option<&str> {
        self.token_uri.as_deref()
    }
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredential")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
