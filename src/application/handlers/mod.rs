//! Application handlers grouped by area.

pub mod plan;
