//! Bearer credentials and their durable storage.
//!
//! Live calls always take a [`Credentials`] value explicitly; nothing in the
//! client reads an ambient global. The store below is only the persistence
//! edge, the place a login result is kept between runs and wiped on logout.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ConfigurationError};

/// Bearer token plus the username it was issued for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub username: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }

    /// A blank token never goes on the wire.
    pub fn is_usable(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// File-backed credential storage with fixed field names.
#[derive(Clone, Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage location from `HEROCLASH_CREDENTIALS_PATH`, if set.
    pub fn from_env() -> Option<Self> {
        let path = std::env::var("HEROCLASH_CREDENTIALS_PATH").ok()?;
        Some(Self::new(path))
    }

    /// Read persisted credentials. An absent file means nobody is logged in.
    pub fn load(&self) -> Result<Option<Credentials>, ClientError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ClientError::Configuration(ConfigurationError::new(
                    format!("failed to read credentials file: {err}"),
                )));
            }
        };
        let credentials = serde_json::from_str::<Credentials>(&raw).map_err(|err| {
            ClientError::Configuration(ConfigurationError::new(format!(
                "malformed credentials file: {err}"
            )))
        })?;
        Ok(Some(credentials))
    }

    pub fn save(&self, credentials: &Credentials) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    ClientError::Configuration(ConfigurationError::new(format!(
                        "failed to create credentials directory: {err}"
                    )))
                })?;
            }
        }
        let json = serde_json::to_string_pretty(credentials).map_err(|err| {
            ClientError::Configuration(ConfigurationError::new(format!(
                "failed to encode credentials: {err}"
            )))
        })?;
        std::fs::write(&self.path, json).map_err(|err| {
            ClientError::Configuration(ConfigurationError::new(format!(
                "failed to write credentials file: {err}"
            )))
        })
    }

    /// Logout. Clearing when nothing is stored is fine.
    pub fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ClientError::Configuration(ConfigurationError::new(
                format!("failed to remove credentials file: {err}"),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_of_absent_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_load_round_trip_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = CredentialStore::new(&path);

        let credentials = Credentials::new("tok-123", "ada");
        store.save(&credentials).unwrap();
        assert_eq!(store.load().unwrap(), Some(credentials));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"token\""));
        assert!(raw.contains("\"username\""));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));

        store.save(&Credentials::new("tok", "ada")).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn blank_token_is_not_usable() {
        assert!(!Credentials::new("  ", "ada").is_usable());
        assert!(Credentials::new("tok", "ada").is_usable());
    }
}
