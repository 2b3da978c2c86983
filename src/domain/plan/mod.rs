//! Plan domain: the template/override merge model and its derived views.

mod complete_action;
mod evidence;
mod group;
mod narrative;
mod override_action;
mod resolved;
mod stats;
mod status;
mod template_action;

pub use complete_action::CompleteAction;
pub use evidence::{Evidence, EvidenceKind};
pub use group::{group_actions, PlanGroup};
pub use narrative::{NarrativeField, NarrativeKind};
pub use override_action::{FieldPatch, OverrideAction, OverridePatch};
pub use resolved::{OrganizationInfo, ResolvedPlan};
pub use stats::PlanStatistics;
pub use status::ActionStatus;
pub use template_action::TemplateAction;
