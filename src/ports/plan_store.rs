//! Plan Store Port - Persistence for templates, overrides, evidence and narratives.
//!
//! The domain depends on this trait; adapters (Postgres, in-memory) provide
//! the implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, OrganizationId, TemplateActionId, UserId};
use crate::domain::plan::{Evidence, NarrativeField, NarrativeKind, OverrideAction, TemplateAction};

/// Organization row as the plan subsystem sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub id: OrganizationId,
    pub name: String,
    pub assigned_technician_id: Option<UserId>,
    pub draft: NarrativeField,
    pub synthetic_report: NarrativeField,
}

/// Port for plan persistence operations.
///
/// # Contract
///
/// Implementations must:
/// - Return template actions ordered by `display_order`, then title
/// - Return evidence ordered newest first
/// - Upsert override rows keyed on (organization, template action)
/// - Treat a missing row on delete as success (idempotent delete)
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Find an organization by ID.
    ///
    /// # Returns
    ///
    /// The record if found, None otherwise.
    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<OrganizationRecord>, DomainError>;

    /// List the active template catalog in display order.
    ///
    /// Inactive template actions are excluded; they stay out of every
    /// resolved plan even when an override row for them survives.
    async fn list_active_template_actions(&self) -> Result<Vec<TemplateAction>, DomainError>;

    /// List all override rows for one organization.
    async fn list_overrides(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<OverrideAction>, DomainError>;

    /// Insert or replace the override row for (organization, template action).
    async fn upsert_override_row(&self, row: &OverrideAction) -> Result<(), DomainError>;

    /// Delete the override row for (organization, template action).
    ///
    /// # Returns
    ///
    /// `true` if a row existed and was removed, `false` if there was
    /// nothing to delete.
    async fn delete_override_row(
        &self,
        organization_id: OrganizationId,
        template_action_id: TemplateActionId,
    ) -> Result<bool, DomainError>;

    /// List evidence for one organization, newest first.
    async fn list_evidence(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Evidence>, DomainError>;

    /// Overwrite one narrative field on the organization record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` with `OrganizationNotFound` if the
    /// organization does not exist.
    async fn update_narrative_field(
        &self,
        organization_id: OrganizationId,
        kind: NarrativeKind,
        field: &NarrativeField,
    ) -> Result<(), DomainError>;
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
