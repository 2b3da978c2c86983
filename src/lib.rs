//! Plan Press - Management Plan Document Service
//!
//! This crate resolves per-organization management plans from a shared
//! template catalog plus sparse overrides, and renders them as streamed,
//! flow-paginated PDF documents.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
