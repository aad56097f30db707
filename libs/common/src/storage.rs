//! Durable token storage for the salon client
//!
//! The client persists exactly one value, the bearer token, under a fixed
//! key. The file-backed store is what the CLI uses; the in-memory store backs
//! tests and embedders that manage persistence themselves.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Fixed key the token is stored under
pub const TOKEN_KEY: &str = "token";

/// Persistence backend for the session token
pub trait TokenStorage: Send + Sync {
    /// Read the stored token, if any
    fn load(&self) -> StorageResult<Option<String>>;

    /// Replace the stored token
    fn store(&self, token: &str) -> StorageResult<()>;

    /// Remove the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> StorageResult<()>;
}

/// Token storage backed by a single file
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Create a storage writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> StorageResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    debug!("Loaded token from {}", self.path.display());
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn store(&self, token: &str) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(StorageError::Io)?;

        // mode() only applies on creation; tighten files left by older runs
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(StorageError::Io)?;
        }
        file.write_all(token.as_bytes()).map_err(StorageError::Io)?;

        info!("Token stored at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Token removed from {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// Token storage kept in process memory
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that already holds `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.slot().clone())
    }

    fn store(&self, token: &str) -> StorageResult<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
