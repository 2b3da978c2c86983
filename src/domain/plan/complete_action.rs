//! The resolved view of a template action for one organization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ActionStatus, OverrideAction, TemplateAction};

/// Template ⊕ optional override, resolved once per read/render.
///
/// Every active template action yields exactly one `CompleteAction` per
/// organization, whether or not an override row exists. Editable fields come
/// from the override only; the template's model text stays a hint and is
/// never silently substituted into the narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteAction {
    pub template: TemplateAction,
    pub edits: Option<OverrideAction>,
}

impl CompleteAction {
    /// Explicit merge function: pairs a catalog entry with the
    /// organization's override row, if any.
    pub fn resolve(template: TemplateAction, edits: Option<OverrideAction>) -> Self {
        Self { template, edits }
    }

    /// The organization's own narrative (never the model text).
    pub fn narrative(&self) -> Option<&str> {
        self.edits.as_ref().and_then(|e| e.narrative.as_deref())
    }

    /// The template's model text, offered as a reference for editors.
    pub fn model_text_hint(&self) -> &str {
        &self.template.model_text
    }

    pub fn responsible(&self) -> Option<&str> {
        self.edits.as_ref().and_then(|e| e.responsible.as_deref())
    }

    pub fn method(&self) -> Option<&str> {
        self.edits.as_ref().and_then(|e| e.method.as_deref())
    }

    pub fn resources(&self) -> Option<&str> {
        self.edits.as_ref().and_then(|e| e.resources.as_deref())
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.edits.as_ref().and_then(|e| e.start_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.edits.as_ref().and_then(|e| e.end_date)
    }

    /// True when the organization marked the action as not applicable.
    pub fn suppressed(&self) -> bool {
        self.edits.as_ref().map(|e| e.suppressed).unwrap_or(false)
    }

    /// Derived display status for a given day.
    pub fn status(&self, today: NaiveDate) -> ActionStatus {
        ActionStatus::derive(
            self.suppressed(),
            self.start_date(),
            self.end_date(),
            today,
        )
    }

    /// Progress predicate: the action counts as answered when any editable
    /// text field holds real content or either date is set. Separate from
    /// status on purpose; used only for statistics.
    pub fn is_answered(&self) -> bool {
        let has_text = [
            self.narrative(),
            self.responsible(),
            self.method(),
            self.resources(),
        ]
        .iter()
        .any(|f| f.map(|s| !s.trim().is_empty()).unwrap_or(false));

        has_text || self.start_date().is_some() || self.end_date().is_some()
    }
}
