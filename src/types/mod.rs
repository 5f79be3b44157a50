//! Core data types for generation requests and output artifacts.

pub mod artifact;
pub mod request;

pub use artifact::{AudioFormat, OutputArtifact};
pub use request::{compute_artifact_id, GenerationRequest, MAX_DURATION_SECS, MIN_DURATION_SECS};
