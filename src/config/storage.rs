//! Artifact storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Artifact storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding uploaded evidence files
    #[serde(default = "default_artifact_root")]
    pub artifact_root: String,
}

impl StorageConfig {
    /// Root directory as a path
    pub fn artifact_root_path(&self) -> PathBuf {
        PathBuf::from(&self.artifact_root)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.artifact_root.trim().is_empty() {
            return Err(ValidationError::MissingArtifactRoot);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            artifact_root: default_artifact_root(),
        }
    }
}

fn default_artifact_root() -> String {
    "./data/artifacts".to_string()
}
