//! Route configuration for plan endpoints.

use axum::routing::{get, patch, put};
use axum::Router;

use super::handlers::{
    delete_action, get_plan, get_plan_document, patch_action, put_narrative, PlanHandlers,
};

/// Creates the plan router with all endpoints.
///
/// Routes:
/// - `GET    /api/organizations/:id/plan` - Resolved plan view
/// - `GET    /api/organizations/:id/plan/document` - Streamed PDF download
/// - `PATCH  /api/organizations/:id/actions/:template_action_id` - Upsert override
/// - `DELETE /api/organizations/:id/actions/:template_action_id` - Reset to template
/// - `PUT    /api/organizations/:id/narratives/:field` - Update narrative field
pub fn plan_routes(handlers: PlanHandlers) -> Router {
    Router::new()
        .route("/api/organizations/:id/plan", get(get_plan))
        .route(
            "/api/organizations/:id/plan/document",
            get(get_plan_document),
        )
        .route(
            "/api/organizations/:id/actions/:template_action_id",
            patch(patch_action).delete(delete_action),
        )
        .route(
            "/api/organizations/:id/narratives/:field",
            put(put_narrative),
        )
        .with_state(handlers)
}
