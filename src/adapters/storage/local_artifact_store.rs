//! Local filesystem implementation of the ArtifactStore port.
//!
//! Evidence files live under a single storage root; stored paths are
//! always relative to it. Paths that try to climb out of the root are
//! rejected before any filesystem call.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::ports::{ArtifactError, ArtifactStore};

/// Filesystem-backed artifact reads rooted at a base directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    base_path: PathBuf,
}

impl LocalArtifactStore {
    /// Create a store rooted at `base_path`.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Resolve a stored path against the root, rejecting anything that
    /// is absolute or contains parent components.
    fn resolve(&self, storage_path: &str) -> Result<PathBuf, ArtifactError> {
        let relative = Path::new(storage_path);
        if relative.components().any(|c| {
            !matches!(c, Component::Normal(_) | Component::CurDir)
        }) {
            return Err(ArtifactError::invalid_path(storage_path));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn read(&self, storage_path: &str) -> Result<Vec<u8>, ArtifactError> {
        let path = self.resolve(storage_path)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ArtifactError::not_found(storage_path))
            }
            Err(e) => Err(ArtifactError::io(e.to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
