//! UpsertOverrideHandler - Creates or partially updates an override row.
//!
//! The patch carries explicit field presence, so an omitted field leaves
//! the stored value untouched while an explicit null clears it.

use std::sync::Arc;

use crate::domain::foundation::{
    DomainError, OrganizationId, TemplateActionId, Timestamp,
};
use crate::domain::plan::{OverrideAction, OverridePatch};
use crate::ports::PlanStore;

/// Command to upsert an organization's override for one template action.
#[derive(Debug, Clone)]
pub struct UpsertOverrideCommand {
    pub organization_id: OrganizationId,
    pub template_action_id: TemplateActionId,
    pub patch: OverridePatch,
}

/// The override row as stored after the operation.
pub type UpsertOverrideResult = OverrideAction;

/// Error type for upserting an override.
#[derive(Debug, Clone)]
pub enum UpsertOverrideError {
    /// Organization not found.
    OrganizationNotFound(OrganizationId),
    /// Template action not found or inactive.
    TemplateActionNotFound(TemplateActionId),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for UpsertOverrideError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpsertOverrideError::OrganizationNotFound(id) => {
                write!(f, "Organization not found: {}", id)
            }
            UpsertOverrideError::TemplateActionNotFound(id) => {
                write!(f, "Template action not found: {}", id)
            }
            UpsertOverrideError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for UpsertOverrideError {}

impl From<DomainError> for UpsertOverrideError {
    fn from(err: DomainError) -> Self {
        UpsertOverrideError::Infrastructure(err.message)
    }
}

/// Handler for the override upsert.
pub struct UpsertOverrideHandler {
    store: Arc<dyn PlanStore>,
}

impl UpsertOverrideHandler {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        command: UpsertOverrideCommand,
    ) -> Result<UpsertOverrideResult, UpsertOverrideError> {
        if self
            .store
            .find_organization(command.organization_id)
            .await?
            .is_none()
        {
            return Err(UpsertOverrideError::OrganizationNotFound(
                command.organization_id,
            ));
        }

        // The catalog listing is the source of truth for "exists and active".
        let templates = self.store.list_active_template_actions().await?;
        if !templates.iter().any(|t| t.id == command.template_action_id) {
            return Err(UpsertOverrideError::TemplateActionNotFound(
                command.template_action_id,
            ));
        }

        let existing = self
            .store
            .list_overrides(command.organization_id)
            .await?
            .into_iter()
            .find(|o| o.template_action_id == command.template_action_id);

        let now = Timestamp::now();
        let row = match existing {
            Some(row) => command.patch.apply_to(row, now),
            None => command.patch.into_new_row(
                command.organization_id,
                command.template_action_id,
                now,
            ),
        };

        self.store.upsert_override_row(&row).await?;

        tracing::debug!(
            organization_id = %row.organization_id,
            template_action_id = %row.template_action_id,
            "Override row upserted"
        );

        Ok(row)
    }
}
