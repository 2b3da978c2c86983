//! In-memory adapters - Non-persistent implementations for tests and
//! local development.

mod plan_store;

pub use plan_store::InMemoryPlanStore;
