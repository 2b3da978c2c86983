//! Template actions: the immutable, shared action catalog.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::TemplateActionId;

/// One recommended action from the shared catalog.
///
/// Seeded administratively and shared by every organization. This subsystem
/// only ever reads template actions; all per-organization edits live in
/// [`OverrideAction`](super::OverrideAction) rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateAction {
    /// Catalog identifier.
    pub id: TemplateActionId,

    /// Category code the action belongs to (e.g. "GOVERNANCA").
    pub category: String,

    /// Display title.
    pub title: String,

    /// Optional subgroup within the category.
    pub subgroup: Option<String>,

    /// Default narrative ("model text"). Shown to editors as a reference,
    /// never substituted into the organization's own narrative.
    pub model_text: String,

    /// Hint for the responsible-party field.
    pub responsible_hint: Option<String>,

    /// Hint for the resources field.
    pub resources_hint: Option<String>,

    /// Hint for the method field.
    pub method_hint: Option<String>,

    /// Position within the catalog; drives all rendering order.
    pub display_order: i32,

    /// Inactive entries are hidden from plans without deleting history.
    pub active: bool,
}

impl TemplateAction {
    /// Grouping key: category plus optional subgroup.
    pub fn group_key(&self) -> (String, Option<String>) {
        (self.category.clone(), self.subgroup.clone())
    }
}
