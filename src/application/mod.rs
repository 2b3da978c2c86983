//! Application layer: orchestration between ports and domain logic.

pub mod handlers;
