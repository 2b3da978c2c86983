//! Artifact Store Port - Read access to uploaded evidence files.
//!
//! Rendering needs the raw bytes of uploaded photos and attendance lists.
//! The domain depends on this trait; adapters (local filesystem) provide
//! the implementation.

use async_trait::async_trait;
use thiserror::Error;

/// Port for reading stored evidence artifacts.
///
/// # Contract
///
/// Implementations must:
/// - Resolve `storage_path` values exactly as persisted on evidence rows
/// - Reject paths that escape the configured storage root
/// - Distinguish a missing artifact from an unreadable one
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Read the raw bytes of one stored artifact.
    ///
    /// # Arguments
    ///
    /// * `storage_path` - The path recorded on the evidence row
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError::NotFound` when the file does not exist,
    /// `ArtifactError::InvalidPath` when the path escapes the storage
    /// root, and `ArtifactError::Io` for anything else.
    async fn read(&self, storage_path: &str) -> Result<Vec<u8>, ArtifactError>;
}

/// Errors that can occur reading an artifact.
#[derive(Debug, Clone, Error)]
pub enum ArtifactError {
    /// Artifact file was not found.
    #[error("Artifact not found: {path}")]
    NotFound { path: String },

    /// Path escapes the storage root.
    #[error("Invalid artifact path: {path}")]
    InvalidPath { path: String },

    /// IO error during read.
    #[error("Artifact IO error: {message}")]
    Io { message: String },
}

impl ArtifactError {
    /// Creates a not found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// True when the artifact simply is not there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArtifactError::NotFound { .. })
    }
}

impl From<std::io::Error> for ArtifactError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ArtifactError::not_found(err.to_string()),
            _ => ArtifactError::io(err.to_string()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
