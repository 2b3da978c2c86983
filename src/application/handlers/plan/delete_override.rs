//! DeleteOverrideHandler - Resets an action back to its template defaults.
//!
//! Deleting the override row is how "reset" works; the template action
//! itself is never touched.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OrganizationId, TemplateActionId};
use crate::ports::PlanStore;

/// Command to remove an organization's override for one template action.
#[derive(Debug, Clone)]
pub struct DeleteOverrideCommand {
    pub organization_id: OrganizationId,
    pub template_action_id: TemplateActionId,
}

/// Result of the removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOverrideResult {
    /// `false` when there was no row to delete. Still a success; the
    /// operation is idempotent.
    pub removed: bool,
}

/// Error type for deleting an override.
#[derive(Debug, Clone)]
pub enum DeleteOverrideError {
    /// Organization not found.
    OrganizationNotFound(OrganizationId),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for DeleteOverrideError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteOverrideError::OrganizationNotFound(id) => {
                write!(f, "Organization not found: {}", id)
            }
            DeleteOverrideError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteOverrideError {}

impl From<DomainError> for DeleteOverrideError {
    fn from(err: DomainError) -> Self {
        DeleteOverrideError::Infrastructure(err.message)
    }
}

/// Handler for the override removal.
pub struct DeleteOverrideHandler {
    store: Arc<dyn PlanStore>,
}

impl DeleteOverrideHandler {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        command: DeleteOverrideCommand,
    ) -> Result<DeleteOverrideResult, DeleteOverrideError> {
        if self
            .store
            .find_organization(command.organization_id)
            .await?
            .is_none()
        {
            return Err(DeleteOverrideError::OrganizationNotFound(
                command.organization_id,
            ));
        }

        let removed = self
            .store
            .delete_override_row(command.organization_id, command.template_action_id)
            .await?;

        if removed {
            tracing::debug!(
                organization_id = %command.organization_id,
                template_action_id = %command.template_action_id,
                "Override row removed"
            );
        }

        Ok(DeleteOverrideResult { removed })
    }
}
