//! # Local File Storage
//!
//! Disk-backed implementation of the core [`FileStorage`] contract, used
//! for business logos and reward/raffle images.
//!
//! ## Contract
//! `upload(path, bytes, overwrite)` stores bytes and returns a descriptor;
//! `public_url` derives the serving URL; `delete` removes by path. Nothing
//! else about the store leaks into business rules.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use puntofiel_core::repository::{FileStorage, RepoResult};
use puntofiel_core::{RepositoryError, StoredFile};

/// File storage rooted at a local directory, served under a base URL.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalFileStorage {
    /// Creates a storage rooted at `root`, with URLs under `base_url`.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let storage = LocalFileStorage::new("./data/files", "https://files.puntofiel.app");
    /// ```
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        LocalFileStorage {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Resolves a storage path under the root, rejecting traversal.
    fn resolve(&self, path: &str) -> RepoResult<PathBuf> {
        let relative = Path::new(path);
        let traversal = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if path.trim().is_empty() || traversal {
            return Err(RepositoryError::Storage {
                message: format!("ruta de archivo inválida: {path}"),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn upload(&self, path: &str, bytes: &[u8], overwrite: bool) -> RepoResult<StoredFile> {
        let full = self.resolve(path)?;

        if !overwrite {
            let exists = tokio::fs::try_exists(&full).await.map_err(storage_err)?;
            if exists {
                return Err(RepositoryError::Storage {
                    message: format!("el archivo ya existe: {path}"),
                });
            }
        }

        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
        }
        tokio::fs::write(&full, bytes).await.map_err(storage_err)?;

        info!(path = %path, bytes = bytes.len(), "File stored");

        Ok(StoredFile {
            path: path.to_string(),
            public_url: self.public_url(path),
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn delete(&self, path: &str) -> RepoResult<()> {
        let full = self.resolve(path)?;
        tokio::fs::remove_file(&full).await.map_err(storage_err)?;
        debug!(path = %path, "File deleted");
        Ok(())
    }
}

fn storage_err(err: std::io::Error) -> RepositoryError {
    RepositoryError::Storage {
        message: err.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
