//! Plan command and query handlers.

// Command handlers
mod delete_override;
mod render_document;
mod update_narrative;
mod upsert_override;

// Query handlers
mod resolve_plan;

#[cfg(test)]
pub(crate) mod testing;

pub use delete_override::{
    DeleteOverrideCommand, DeleteOverrideError, DeleteOverrideHandler, DeleteOverrideResult,
};
pub use render_document::{
    RenderDocumentCommand, RenderDocumentError, RenderDocumentHandler, RenderDocumentResult,
};
pub use update_narrative::{
    UpdateNarrativeCommand, UpdateNarrativeError, UpdateNarrativeHandler, UpdateNarrativeResult,
};
pub use upsert_override::{
    UpsertOverrideCommand, UpsertOverrideError, UpsertOverrideHandler, UpsertOverrideResult,
};

// Query handlers
pub use resolve_plan::{ResolvePlanError, ResolvePlanHandler, ResolvePlanQuery, ResolvePlanResult};
