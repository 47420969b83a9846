//! Persisted `auth_token`.
//!
//! The token is written by the login flow (or `session set-token`) and
//! only read by protected views.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use expo_admin_core::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The token kept in a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// The stored token, `None` when the file does not exist or is blank.
    pub async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Session built from the stored token.
    pub async fn session(&self) -> Result<Session, TokenStoreError> {
        Ok(Session::new(self.load().await?))
    }

    pub async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        tokio::fs::write(&self.path, token.trim())
            .await
            .map_err(|e| self.io_error(e))?;
        tracing::info!(path = %self.path.display(), "Token saved");
        Ok(())
    }

    /// Remove the token. Clearing an absent token is not an error.
    pub async fn clear(&self) -> Result<(), TokenStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Token cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
