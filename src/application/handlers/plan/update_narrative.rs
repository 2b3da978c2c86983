//! UpdateNarrativeHandler - Replaces one of the organization-level
//! free-text fields (draft or synthetic report).

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, OrganizationId, Timestamp, UserId};
use crate::domain::plan::{NarrativeField, NarrativeKind};
use crate::ports::PlanStore;

/// Command to update one narrative field.
#[derive(Debug, Clone)]
pub struct UpdateNarrativeCommand {
    pub organization_id: OrganizationId,
    pub kind: NarrativeKind,
    /// Full replacement text; `None` clears the field.
    pub text: Option<String>,
    pub updated_by: UserId,
}

/// The narrative field as stored after the operation.
pub type UpdateNarrativeResult = NarrativeField;

/// Error type for updating a narrative.
#[derive(Debug, Clone)]
pub enum UpdateNarrativeError {
    /// Organization not found.
    NotFound(OrganizationId),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for UpdateNarrativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateNarrativeError::NotFound(id) => write!(f, "Organization not found: {}", id),
            UpdateNarrativeError::Infrastructure(msg) => {
                write!(f, "Infrastructure error: {}", msg)
            }
        }
    }
}

impl std::error::Error for UpdateNarrativeError {}

impl From<DomainError> for UpdateNarrativeError {
    fn from(err: DomainError) -> Self {
        UpdateNarrativeError::Infrastructure(err.message)
    }
}

/// Handler for the narrative update.
pub struct UpdateNarrativeHandler {
    store: Arc<dyn PlanStore>,
}

impl UpdateNarrativeHandler {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        command: UpdateNarrativeCommand,
    ) -> Result<UpdateNarrativeResult, UpdateNarrativeError> {
        if self
            .store
            .find_organization(command.organization_id)
            .await?
            .is_none()
        {
            return Err(UpdateNarrativeError::NotFound(command.organization_id));
        }

        let field = NarrativeField {
            text: command.text,
            updated_by: Some(command.updated_by),
            updated_at: Some(Timestamp::now()),
        };

        self.store
            .update_narrative_field(command.organization_id, command.kind, &field)
            .await
            .map_err(|e| {
                // The pre-check can race with a concurrent delete.
                if e.code == ErrorCode::OrganizationNotFound {
                    UpdateNarrativeError::NotFound(command.organization_id)
                } else {
                    UpdateNarrativeError::Infrastructure(e.message)
                }
            })?;

        tracing::debug!(
            organization_id = %command.organization_id,
            field = command.kind.as_str(),
            "Narrative field updated"
        );

        Ok(field)
    }
}
