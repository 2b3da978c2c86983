//! Shared mock store for the plan handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, OrganizationId, TemplateActionId};
use crate::domain::plan::{
    Evidence, NarrativeField, NarrativeKind, OverrideAction, TemplateAction,
};
use crate::ports::{OrganizationRecord, PlanStore};

pub(crate) struct MockPlanStore {
    organizations: Mutex<Vec<OrganizationRecord>>,
    templates: Mutex<Vec<TemplateAction>>,
    overrides: Mutex<Vec<OverrideAction>>,
    evidence: Mutex<Vec<Evidence>>,
    fail: bool,
}

impl MockPlanStore {
    pub(crate) fn new() -> Self {
        Self {
            organizations: Mutex::new(Vec::new()),
            templates: Mutex::new(Vec::new()),
            overrides: Mutex::new(Vec::new()),
            evidence: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub(crate) fn insert_organization(&self, record: OrganizationRecord) {
        self.organizations.lock().unwrap().push(record);
    }

    pub(crate) fn insert_template(&self, template: TemplateAction) {
        self.templates.lock().unwrap().push(template);
    }

    pub(crate) fn insert_override(&self, row: OverrideAction) {
        self.overrides.lock().unwrap().push(row);
    }

    pub(crate) fn insert_evidence(&self, item: Evidence) {
        self.evidence.lock().unwrap().push(item);
    }

    pub(crate) fn override_rows(&self) -> Vec<OverrideAction> {
        self.overrides.lock().unwrap().clone()
    }

    pub(crate) fn organization(&self, id: OrganizationId) -> Option<OrganizationRecord> {
        self.organizations
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::database("Simulated store failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PlanStore for MockPlanStore {
    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<OrganizationRecord>, DomainError> {
        self.check()?;
        Ok(self.organization(id))
    }

    async fn list_active_template_actions(&self) -> Result<Vec<TemplateAction>, DomainError> {
        self.check()?;
        let mut templates: Vec<TemplateAction> = self
            .templates
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.active)
            .cloned()
            .collect();
        templates.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(templates)
    }

    async fn list_overrides(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<OverrideAction>, DomainError> {
        self.check()?;
        Ok(self
            .overrides
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn upsert_override_row(&self, row: &OverrideAction) -> Result<(), DomainError> {
        self.check()?;
        let mut rows = self.overrides.lock().unwrap();
        rows.retain(|o| {
            !(o.organization_id == row.organization_id
                && o.template_action_id == row.template_action_id)
        });
        rows.push(row.clone());
        Ok(())
    }

    async fn delete_override_row(
        &self,
        organization_id: OrganizationId,
        template_action_id: TemplateActionId,
    ) -> Result<bool, DomainError> {
        self.check()?;
        let mut rows = self.overrides.lock().unwrap();
        let before = rows.len();
        rows.retain(|o| {
            !(o.organization_id == organization_id
                && o.template_action_id == template_action_id)
        });
        Ok(rows.len() < before)
    }

    async fn list_evidence(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Evidence>, DomainError> {
        self.check()?;
        let mut items: Vec<Evidence> = self
            .evidence
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.organization_id == organization_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update_narrative_field(
        &self,
        organization_id: OrganizationId,
        kind: NarrativeKind,
        field: &NarrativeField,
    ) -> Result<(), DomainError> {
        self.check()?;
        let mut orgs = self.organizations.lock().unwrap();
        let org = orgs
            .iter_mut()
            .find(|o| o.id == organization_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::OrganizationNotFound, "Organization not found")
            })?;
        match kind {
            NarrativeKind::Draft => org.draft = field.clone(),
            NarrativeKind::SyntheticReport => org.synthetic_report = field.clone(),
        }
        Ok(())
    }
}

/// Template catalog entry for tests.
pub(crate) fn template(category: &str, subgroup: Option<&str>, order: i32) -> TemplateAction {
    TemplateAction {
        id: TemplateActionId::new(),
        category: category.to_string(),
        title: format!("Ação {}", order),
        subgroup: subgroup.map(str::to_string),
        model_text: "Texto modelo.".to_string(),
        responsible_hint: None,
        resources_hint: None,
        method_hint: None,
        display_order: order,
        active: true,
    }
}

/// Store seeded with one organization and the given catalog.
pub(crate) fn seeded_store(templates: Vec<TemplateAction>) -> (MockPlanStore, OrganizationId) {
    let store = MockPlanStore::new();
    let org_id = OrganizationId::new();
    store.insert_organization(OrganizationRecord {
        id: org_id,
        name: "Associação Quilombola Boa Vista".to_string(),
        assigned_technician_id: None,
        draft: NarrativeField::default(),
        synthetic_report: NarrativeField::default(),
    });
    for t in templates {
        store.insert_template(t);
    }
    (store, org_id)
}
