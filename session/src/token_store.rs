//! Token persistence.
//!
//! The session survives process restarts by writing the bearer token to
//! a small store. The trait is synchronous: the stores are a mutex cell
//! and a tiny file, and the flows call them outside any lock.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Token store failure.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Underlying storage I/O failed.
    #[error("token storage failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistent storage for the bearer token.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read. A missing
    /// token is `Ok(None)`, not an error.
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Store the token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the stored token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// In-memory token store for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.cell().clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.cell() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.cell() = None;
        Ok(())
    }
}

/// Token store backed by a single file.
///
/// The file holds the raw token string. Clearing removes the file, and a
/// missing file loads as no token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim().to_string();
                Ok((!token.is_empty()).then_some(token))
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
