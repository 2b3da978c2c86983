//! Organization-specific overrides of template actions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrganizationId, TemplateActionId, Timestamp};

/// Sparse, per-organization edit of a template action.
///
/// Created lazily on first edit; at most one row exists per
/// (organization, template action) pair. Deleting the row resets the
/// action back to its template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideAction {
    pub organization_id: OrganizationId,
    pub template_action_id: TemplateActionId,

    /// The organization's own narrative text.
    pub narrative: Option<String>,

    /// Responsible party.
    pub responsible: Option<String>,

    /// Planned start date (day precision).
    pub start_date: Option<NaiveDate>,

    /// Planned end date (day precision).
    pub end_date: Option<NaiveDate>,

    /// Method description.
    pub method: Option<String>,

    /// Resources description.
    pub resources: Option<String>,

    /// Marks the action as not applicable to this organization.
    pub suppressed: bool,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Presence-aware patch value for one editable field.
///
/// Distinguishes "field omitted from the patch" (`Keep`) from "field set to
/// null" (`Clear`) from "field set to a value" (`Set`). Partial updates only
/// touch non-`Keep` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldPatch<T> {
    /// Leave the stored value untouched.
    #[default]
    Keep,
    /// Null the stored value.
    Clear,
    /// Replace the stored value.
    Set(T),
}

impl<T> FieldPatch<T> {
    /// True when the patch leaves the field untouched.
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldPatch::Keep)
    }

    /// Resolves the patch against the currently stored value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            FieldPatch::Keep => current,
            FieldPatch::Clear => None,
            FieldPatch::Set(value) => Some(value),
        }
    }

    /// Returns the patched value as an option-of-option:
    /// `None` = keep, `Some(None)` = clear, `Some(Some(v))` = set.
    pub fn into_change(self) -> Option<Option<T>> {
        match self {
            FieldPatch::Keep => None,
            FieldPatch::Clear => Some(None),
            FieldPatch::Set(value) => Some(Some(value)),
        }
    }
}

/// Partial update for an override row. Omitted fields stay untouched.
#[derive(Debug, Clone, Default)]
pub struct OverridePatch {
    pub narrative: FieldPatch<String>,
    pub responsible: FieldPatch<String>,
    pub start_date: FieldPatch<NaiveDate>,
    pub end_date: FieldPatch<NaiveDate>,
    pub method: FieldPatch<String>,
    pub resources: FieldPatch<String>,
    /// Suppression is a plain flag: `None` keeps the stored value.
    pub suppressed: Option<bool>,
}

impl OverridePatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.narrative.is_keep()
            && self.responsible.is_keep()
            && self.start_date.is_keep()
            && self.end_date.is_keep()
            && self.method.is_keep()
            && self.resources.is_keep()
            && self.suppressed.is_none()
    }

    /// Applies the patch to an existing override, stamping `updated_at`.
    pub fn apply_to(self, mut row: OverrideAction, now: Timestamp) -> OverrideAction {
        row.narrative = self.narrative.apply(row.narrative);
        row.responsible = self.responsible.apply(row.responsible);
        row.start_date = self.start_date.apply(row.start_date);
        row.end_date = self.end_date.apply(row.end_date);
        row.method = self.method.apply(row.method);
        row.resources = self.resources.apply(row.resources);
        if let Some(suppressed) = self.suppressed {
            row.suppressed = suppressed;
        }
        row.updated_at = now;
        row
    }

    /// Materializes a fresh override row from the patch (first edit).
    pub fn into_new_row(
        self,
        organization_id: OrganizationId,
        template_action_id: TemplateActionId,
        now: Timestamp,
    ) -> OverrideAction {
        let blank = OverrideAction {
            organization_id,
            template_action_id,
            narrative: None,
            responsible: None,
            start_date: None,
            end_date: None,
            method: None,
            resources: None,
            suppressed: false,
            created_at: now,
            updated_at: now,
        };
        self.apply_to(blank, now)
    }
}
