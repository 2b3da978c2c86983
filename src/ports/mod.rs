//! Ports: trait contracts the application layer depends on.

mod artifact_store;
mod document_renderer;
mod plan_store;

pub use artifact_store::{ArtifactError, ArtifactStore};
pub use document_renderer::{DocumentRenderer, DocumentStream};
pub use plan_store::{OrganizationRecord, PlanStore};
