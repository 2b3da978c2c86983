//! PostgreSQL adapters - Database implementations for persistence ports.

mod plan_store;

pub use plan_store::PostgresPlanStore;
