//! ResolvePlanHandler - Query handler assembling one organization's plan.
//!
//! Merges the active template catalog with the organization's override
//! rows, producing exactly one complete action per active template.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, OrganizationId};
use crate::domain::plan::{group_actions, CompleteAction, OrganizationInfo, ResolvedPlan};
use crate::ports::PlanStore;

/// Query to resolve an organization's plan.
#[derive(Debug, Clone)]
pub struct ResolvePlanQuery {
    pub organization_id: OrganizationId,
}

/// Result of a successful resolution.
pub type ResolvePlanResult = ResolvedPlan;

/// Error type for resolving a plan.
#[derive(Debug, Clone)]
pub enum ResolvePlanError {
    /// Organization not found.
    NotFound(OrganizationId),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for ResolvePlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvePlanError::NotFound(id) => write!(f, "Organization not found: {}", id),
            ResolvePlanError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for ResolvePlanError {}

impl From<DomainError> for ResolvePlanError {
    fn from(err: DomainError) -> Self {
        ResolvePlanError::Infrastructure(err.message)
    }
}

/// Handler for resolving the complete plan view.
pub struct ResolvePlanHandler {
    store: Arc<dyn PlanStore>,
}

impl ResolvePlanHandler {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ResolvePlanQuery,
    ) -> Result<ResolvePlanResult, ResolvePlanError> {
        resolve_plan(self.store.as_ref(), query.organization_id)
            .await?
            .ok_or(ResolvePlanError::NotFound(query.organization_id))
    }
}

/// Shared resolution routine, also used by the render handler.
///
/// Returns `None` when the organization does not exist.
pub(crate) async fn resolve_plan(
    store: &dyn PlanStore,
    organization_id: OrganizationId,
) -> Result<Option<ResolvedPlan>, DomainError> {
    let Some(org) = store.find_organization(organization_id).await? else {
        return Ok(None);
    };

    let templates = store.list_active_template_actions().await?;
    let mut overrides: HashMap<_, _> = store
        .list_overrides(organization_id)
        .await?
        .into_iter()
        .map(|row| (row.template_action_id, row))
        .collect();

    // Exactly one complete action per active template; orphaned override
    // rows (inactive templates) are dropped here.
    let actions: Vec<CompleteAction> = templates
        .into_iter()
        .map(|t| {
            let edits = overrides.remove(&t.id);
            CompleteAction::resolve(t, edits)
        })
        .collect();

    let evidence = store.list_evidence(organization_id).await?;

    Ok(Some(ResolvedPlan {
        organization: OrganizationInfo {
            id: org.id,
            name: org.name,
            assigned_technician_id: org.assigned_technician_id,
        },
        draft: org.draft,
        synthetic_report: org.synthetic_report,
        evidence,
        groups: group_actions(actions),
    }))
}
