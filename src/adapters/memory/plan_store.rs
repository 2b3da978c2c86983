//! In-Memory Plan Store Adapter
//!
//! Stores organizations, the template catalog, override rows and evidence
//! in memory. Useful for testing and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OrganizationId, TemplateActionId};
use crate::domain::plan::{
    Evidence, NarrativeField, NarrativeKind, OverrideAction, TemplateAction,
};
use crate::ports::{OrganizationRecord, PlanStore};

/// In-memory plan persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanStore {
    organizations: Arc<RwLock<HashMap<OrganizationId, OrganizationRecord>>>,
    templates: Arc<RwLock<Vec<TemplateAction>>>,
    overrides: Arc<RwLock<HashMap<(OrganizationId, TemplateActionId), OverrideAction>>>,
    evidence: Arc<RwLock<Vec<Evidence>>>,
}

impl InMemoryPlanStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an organization record.
    pub async fn insert_organization(&self, record: OrganizationRecord) {
        self.organizations.write().await.insert(record.id, record);
    }

    /// Seed a template action into the catalog.
    pub async fn insert_template(&self, action: TemplateAction) {
        self.templates.write().await.push(action);
    }

    /// Seed an evidence row.
    pub async fn insert_evidence(&self, evidence: Evidence) {
        self.evidence.write().await.push(evidence);
    }

    /// Number of stored override rows (useful for tests).
    pub async fn override_count(&self) -> usize {
        self.overrides.read().await.len()
    }
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<OrganizationRecord>, DomainError> {
        Ok(self.organizations.read().await.get(&id).cloned())
    }

    async fn list_active_template_actions(&self) -> Result<Vec<TemplateAction>, DomainError> {
        let mut actions: Vec<TemplateAction> = self
            .templates
            .read()
            .await
            .iter()
            .filter(|t| t.active)
            .cloned()
            .collect();
        actions.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(actions)
    }

    async fn list_overrides(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<OverrideAction>, DomainError> {
        Ok(self
            .overrides
            .read()
            .await
            .values()
            .filter(|o| o.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn upsert_override_row(&self, row: &OverrideAction) -> Result<(), DomainError> {
        self.overrides
            .write()
            .await
            .insert((row.organization_id, row.template_action_id), row.clone());
        Ok(())
    }

    async fn delete_override_row(
        &self,
        organization_id: OrganizationId,
        template_action_id: TemplateActionId,
    ) -> Result<bool, DomainError> {
        Ok(self
            .overrides
            .write()
            .await
            .remove(&(organization_id, template_action_id))
            .is_some())
    }

    async fn list_evidence(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Evidence>, DomainError> {
        let mut rows: Vec<Evidence> = self
            .evidence
            .read()
            .await
            .iter()
            .filter(|e| e.organization_id == organization_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_narrative_field(
        &self,
        organization_id: OrganizationId,
        kind: NarrativeKind,
        field: &NarrativeField,
    ) -> Result<(), DomainError> {
        let mut organizations = self.organizations.write().await;
        let record = organizations.get_mut(&organization_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::OrganizationNotFound,
                format!("Organization not found: {}", organization_id),
            )
        })?;
        match kind {
            NarrativeKind::Draft => record.draft = field.clone(),
            NarrativeKind::SyntheticReport => record.synthetic_report = field.clone(),
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
