//! The fully-resolved plan snapshot for one organization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrganizationId, UserId};

use super::{CompleteAction, Evidence, NarrativeField, PlanGroup, PlanStatistics};

/// Organization header data carried into the rendered document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationInfo {
    pub id: OrganizationId,
    pub name: String,
    pub assigned_technician_id: Option<UserId>,
}

/// One organization's plan, resolved against the template catalog.
///
/// Exists only for the duration of a single read or render; a concurrent
/// edit during rendering is simply not reflected in that render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedPlan {
    pub organization: OrganizationInfo,
    pub draft: NarrativeField,
    pub synthetic_report: NarrativeField,
    /// Most recent first.
    pub evidence: Vec<Evidence>,
    /// (category, subgroup) buckets in template order.
    pub groups: Vec<PlanGroup>,
}

impl ResolvedPlan {
    /// Flat iterator over every complete action in group order.
    pub fn all_actions(&self) -> impl Iterator<Item = &CompleteAction> {
        self.groups.iter().flat_map(|g| g.actions.iter())
    }

    /// Groups whose category still has at least one visible action.
    ///
    /// Categories where everything is suppressed are skipped entirely.
    pub fn renderable_groups(&self) -> Vec<&PlanGroup> {
        let visible_categories: Vec<&str> = self
            .groups
            .iter()
            .filter(|g| g.visible_actions().next().is_some())
            .map(|g| g.category.as_str())
            .collect();

        self.groups
            .iter()
            .filter(|g| visible_categories.contains(&g.category.as_str()))
            .collect()
    }

    /// Statistics projection over the whole snapshot.
    pub fn statistics(&self, today: NaiveDate) -> PlanStatistics {
        let actions: Vec<CompleteAction> = self.all_actions().cloned().collect();
        PlanStatistics::project(&actions, &self.evidence, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrganizationId, TemplateActionId, Timestamp};
    use crate::domain::plan::{group_actions, OverrideAction, TemplateAction};

    fn action(category: &str, order: i32, suppressed: bool) -> CompleteAction {
        let t = TemplateAction {
            id: TemplateActionId::new(),
            category: category.to_string(),
            title: format!("Ação {}", order),
            subgroup: None,
            model_text: String::new(),
            responsible_hint: None,
            resources_hint: None,
            method_hint: None,
            display_order: order,
            active: true,
        };
        let edits = suppressed.then(|| OverrideAction {
            organization_id: OrganizationId::new(),
            template_action_id: t.id,
            narrative: None,
            responsible: None,
            start_date: None,
            end_date: None,
            method: None,
            resources: None,
            suppressed: true,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        });
        CompleteAction::resolve(t, edits)
    }

    fn plan(actions: Vec<CompleteAction>) -> ResolvedPlan {
        ResolvedPlan {
            organization: OrganizationInfo {
                id: OrganizationId::new(),
                name: "Associação Teste".to_string(),
                assigned_technician_id: None,
            },
            draft: NarrativeField::default(),
            synthetic_report: NarrativeField::default(),
            evidence: vec![],
            groups: group_actions(actions),
        }
    }

    #[test]
    fn fully_suppressed_category_is_not_renderable() {
        let plan = plan(vec![
            action("SAUDE", 1, true),
            action("EDUCACAO", 2, false),
        ]);

        let renderable = plan.renderable_groups();
        assert_eq!(renderable.len(), 1);
        assert_eq!(renderable[0].category, "EDUCACAO");
    }

    #[test]
    fn category_with_any_visible_action_keeps_all_its_groups() {
        let plan = plan(vec![action("SAUDE", 1, true), action("SAUDE", 2, false)]);

        let renderable = plan.renderable_groups();
        assert_eq!(renderable.len(), 1);
        assert_eq!(renderable[0].category, "SAUDE");
    }

    #[test]
    fn all_actions_walks_every_group() {
        let plan = plan(vec![
            action("SAUDE", 1, false),
            action("EDUCACAO", 2, false),
            action("SAUDE", 3, false),
        ]);

        assert_eq!(plan.all_actions().count(), 3);
    }
}
