//! HTTP adapter for plan endpoints.

mod dto;
mod handlers;
mod routes;

pub use handlers::{EditorId, PlanHandlers};
pub use routes::plan_routes;
