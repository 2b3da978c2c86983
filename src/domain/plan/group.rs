//! Grouping of complete actions into (category, subgroup) buckets.

use serde::{Deserialize, Serialize};

use super::CompleteAction;

/// One (category, subgroup) bucket of complete actions.
///
/// Ordering inside a group follows template display order; group ordering
/// follows first appearance in the ordered catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanGroup {
    pub category: String,
    pub subgroup: Option<String>,
    pub actions: Vec<CompleteAction>,
}

impl PlanGroup {
    /// Actions shown in the rendered tables (non-suppressed).
    pub fn visible_actions(&self) -> impl Iterator<Item = &CompleteAction> {
        self.actions.iter().filter(|a| !a.suppressed())
    }

    /// Display heading: "CATEGORY — Subgroup" or just the category.
    pub fn heading(&self) -> String {
        match &self.subgroup {
            Some(sub) => format!("{} — {}", self.category, sub),
            None => self.category.clone(),
        }
    }
}

/// Buckets actions by (category, subgroup), preserving first-seen order of
/// categories and of subgroups within each category.
///
/// The input must already be sorted by template display order; grouping is
/// stable and never reorders actions.
pub fn group_actions(actions: Vec<CompleteAction>) -> Vec<PlanGroup> {
    let mut groups: Vec<PlanGroup> = Vec::new();

    for action in actions {
        let key = action.template.group_key();
        match groups
            .iter_mut()
            .find(|g| g.category == key.0 && g.subgroup == key.1)
        {
            Some(group) => group.actions.push(action),
            None => groups.push(PlanGroup {
                category: key.0,
                subgroup: key.1,
                actions: vec![action],
            }),
        }
    }

    // Subgroups stay clustered under their category even when the catalog
    // interleaves categories.
    let mut ordered: Vec<PlanGroup> = Vec::with_capacity(groups.len());
    let mut category_order: Vec<String> = Vec::new();
    for group in &groups {
        if !category_order.contains(&group.category) {
            category_order.push(group.category.clone());
        }
    }
    for category in category_order {
        for group in groups.iter().filter(|g| g.category == category) {
            ordered.push(group.clone());
        }
    }
    ordered
}
