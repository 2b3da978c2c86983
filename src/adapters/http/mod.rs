//! HTTP adapters - REST API implementations.

pub mod plan;

pub use plan::{plan_routes, PlanHandlers};
