//! Storage adapters - Filesystem access to uploaded evidence files.

mod local_artifact_store;

pub use local_artifact_store::LocalArtifactStore;
