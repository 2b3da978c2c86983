//! Uploaded evidence artifacts (photos, attendance lists).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EvidenceId, OrganizationId, Timestamp, UserId};

/// Kind of evidence artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    /// A photograph, rendered in the gallery grid.
    Photo,
    /// An attendance-list document, rendered as a list entry.
    AttendanceList,
}

/// One uploaded artifact attached to an organization.
///
/// Upload and physical-file lifecycle belong to the upload collaborator;
/// this subsystem only reads the row and the stored file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub organization_id: OrganizationId,
    pub kind: EvidenceKind,
    pub original_filename: String,
    /// Path relative to the artifact storage root.
    pub storage_path: String,
    pub caption: Option<String>,
    pub uploaded_by: UserId,
    pub created_at: Timestamp,
}

impl Evidence {
    /// Caption shown under the gallery cell; falls back to the filename.
    pub fn display_caption(&self) -> &str {
        self.caption
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.original_filename)
    }
}
