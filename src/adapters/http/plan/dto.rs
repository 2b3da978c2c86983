//! HTTP DTOs for plan endpoints.
//!
//! These types decouple the HTTP API from domain types. The override
//! request keeps field presence: an omitted field leaves the stored value
//! untouched, an explicit `null` clears it.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::plan::{
    ActionStatus, CompleteAction, Evidence, EvidenceKind, FieldPatch, NarrativeField,
    OverrideAction, OverridePatch, PlanGroup, PlanStatistics, ResolvedPlan,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Deserializes a present field into `Some(...)`, so serde's default keeps
/// "absent" (`None`) apart from "present but null" (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn to_field_patch<T>(change: Option<Option<T>>) -> FieldPatch<T> {
    match change {
        None => FieldPatch::Keep,
        Some(None) => FieldPatch::Clear,
        Some(Some(value)) => FieldPatch::Set(value),
    }
}

/// Request body for PATCH on one plan action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertOverrideRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub narrative: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub responsible: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub method: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub resources: Option<Option<String>>,
    #[serde(default)]
    pub suppressed: Option<bool>,
}

impl UpsertOverrideRequest {
    pub fn into_patch(self) -> OverridePatch {
        OverridePatch {
            narrative: to_field_patch(self.narrative),
            responsible: to_field_patch(self.responsible),
            start_date: to_field_patch(self.start_date),
            end_date: to_field_patch(self.end_date),
            method: to_field_patch(self.method),
            resources: to_field_patch(self.resources),
            suppressed: self.suppressed,
        }
    }
}

/// Request body for PUT on one narrative field.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNarrativeRequest {
    /// Full replacement text; `null` clears the field.
    pub text: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full plan view returned by GET .../plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub organization_id: String,
    pub organization_name: String,
    pub assigned_technician_id: Option<String>,
    pub draft: NarrativeResponse,
    pub synthetic_report: NarrativeResponse,
    pub statistics: StatisticsResponse,
    pub groups: Vec<GroupResponse>,
    pub evidence: Vec<EvidenceResponse>,
}

impl PlanResponse {
    pub fn from_plan(plan: &ResolvedPlan, today: NaiveDate) -> Self {
        Self {
            organization_id: plan.organization.id.to_string(),
            organization_name: plan.organization.name.clone(),
            assigned_technician_id: plan
                .organization
                .assigned_technician_id
                .map(|id| id.to_string()),
            draft: NarrativeResponse::from(&plan.draft),
            synthetic_report: NarrativeResponse::from(&plan.synthetic_report),
            statistics: StatisticsResponse::from(plan.statistics(today)),
            groups: plan
                .groups
                .iter()
                .map(|g| GroupResponse::from_group(g, today))
                .collect(),
            evidence: plan.evidence.iter().map(EvidenceResponse::from).collect(),
        }
    }
}

/// One narrative field with its edit trail.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeResponse {
    pub text: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: Option<Timestamp>,
}

impl From<&NarrativeField> for NarrativeResponse {
    fn from(field: &NarrativeField) -> Self {
        Self {
            text: field.text.clone(),
            updated_by: field.updated_by.map(|id| id.to_string()),
            updated_at: field.updated_at,
        }
    }
}

/// Summary counts for the plan header.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub total: usize,
    pub answered: usize,
    pub ignored: usize,
    pub not_started: usize,
    pub completed: usize,
    pub pending: usize,
    pub photos: usize,
    pub attendance_lists: usize,
}

impl From<PlanStatistics> for StatisticsResponse {
    fn from(stats: PlanStatistics) -> Self {
        Self {
            total: stats.total,
            answered: stats.answered,
            ignored: stats.ignored,
            not_started: stats.not_started,
            completed: stats.completed,
            pending: stats.pending,
            photos: stats.photos,
            attendance_lists: stats.attendance_lists,
        }
    }
}

/// One (category, subgroup) bucket of actions.
#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub category: String,
    pub subgroup: Option<String>,
    pub heading: String,
    pub actions: Vec<ActionResponse>,
}

impl GroupResponse {
    fn from_group(group: &PlanGroup, today: NaiveDate) -> Self {
        Self {
            category: group.category.clone(),
            subgroup: group.subgroup.clone(),
            heading: group.heading(),
            actions: group
                .actions
                .iter()
                .map(|a| ActionResponse::from_action(a, today))
                .collect(),
        }
    }
}

/// One resolved action: template data plus the organization's edits.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub template_action_id: String,
    pub title: String,
    pub model_text: String,
    pub responsible_hint: Option<String>,
    pub resources_hint: Option<String>,
    pub method_hint: Option<String>,
    pub narrative: Option<String>,
    pub responsible: Option<String>,
    pub method: Option<String>,
    pub resources: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub suppressed: bool,
    pub answered: bool,
    pub status: ActionStatus,
    /// True when an override row exists for this organization.
    pub edited: bool,
}

impl ActionResponse {
    fn from_action(action: &CompleteAction, today: NaiveDate) -> Self {
        Self {
            template_action_id: action.template.id.to_string(),
            title: action.template.title.clone(),
            model_text: action.template.model_text.clone(),
            responsible_hint: action.template.responsible_hint.clone(),
            resources_hint: action.template.resources_hint.clone(),
            method_hint: action.template.method_hint.clone(),
            narrative: action.narrative().map(str::to_string),
            responsible: action.responsible().map(str::to_string),
            method: action.method().map(str::to_string),
            resources: action.resources().map(str::to_string),
            start_date: action.start_date(),
            end_date: action.end_date(),
            suppressed: action.suppressed(),
            answered: action.is_answered(),
            status: action.status(today),
            edited: action.edits.is_some(),
        }
    }
}

/// One evidence row (bytes are not exposed here).
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceResponse {
    pub id: String,
    pub kind: EvidenceKind,
    pub original_filename: String,
    pub caption: Option<String>,
    pub uploaded_by: String,
    pub created_at: Timestamp,
}

impl From<&Evidence> for EvidenceResponse {
    fn from(evidence: &Evidence) -> Self {
        Self {
            id: evidence.id.to_string(),
            kind: evidence.kind,
            original_filename: evidence.original_filename.clone(),
            caption: evidence.caption.clone(),
            uploaded_by: evidence.uploaded_by.to_string(),
            created_at: evidence.created_at,
        }
    }
}

/// The override row as stored after a PATCH.
#[derive(Debug, Clone, Serialize)]
pub struct OverrideResponse {
    pub organization_id: String,
    pub template_action_id: String,
    pub narrative: Option<String>,
    pub responsible: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub method: Option<String>,
    pub resources: Option<String>,
    pub suppressed: bool,
    pub updated_at: Timestamp,
}

impl From<OverrideAction> for OverrideResponse {
    fn from(row: OverrideAction) -> Self {
        Self {
            organization_id: row.organization_id.to_string(),
            template_action_id: row.template_action_id.to_string(),
            narrative: row.narrative,
            responsible: row.responsible,
            start_date: row.start_date,
            end_date: row.end_date,
            method: row.method,
            resources: row.resources,
            suppressed: row.suppressed,
            updated_at: row.updated_at,
        }
    }
}

/// Response for the override delete (reset to template).
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOverrideResponse {
    pub removed: bool,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
