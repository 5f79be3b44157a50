//! Generation request type.
//!
//! A GenerationRequest captures everything a provider needs to synthesize a
//! soundscape. Requests are immutable once constructed and are identified by
//! a deterministic artifact id computed from their parameters.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::providers::ProviderKind;

/// Minimum supported generation duration in seconds.
pub const MIN_DURATION_SECS: u32 = 60;

/// Maximum supported generation duration in seconds.
pub const MAX_DURATION_SECS: u32 = 300;

/// A single audio generation request.
///
/// Constructed once per invocation and never mutated after dispatch.
/// Identical requests (same prompt, duration, provider and seed) always
/// produce the same artifact id, enabling reproducible output names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Full generation prompt (composed from a preset or given verbatim).
    pub prompt: String,

    /// Requested duration in seconds. Constraints: 60-300.
    pub duration_secs: u32,

    /// Provider chosen to fulfill the request.
    pub provider: ProviderKind,

    /// Seed for reproducible synthesis.
    pub seed: u64,
}

impl GenerationRequest {
    /// Creates a new request.
    pub fn new(prompt: String, duration_secs: u32, provider: ProviderKind, seed: u64) -> Self {
        Self {
            prompt,
            duration_secs,
            provider,
            seed,
        }
    }

    /// Validates that the request meets all constraints.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.prompt.is_empty() {
            return Some("Prompt cannot be empty".to_string());
        }

        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&self.duration_secs) {
            return Some(format!(
                "Duration must be between {} and {} seconds, got {}",
                MIN_DURATION_SECS, MAX_DURATION_SECS, self.duration_secs
            ));
        }

        None
    }

    /// Returns the deterministic artifact id for this request.
    pub fn artifact_id(&self) -> String {
        compute_artifact_id(
            &self.prompt,
            self.seed,
            self.duration_secs,
            self.provider.as_str(),
        )
    }
}

/// Computes a deterministic artifact ID from generation parameters.
///
/// The artifact ID is the first 16 hex characters of the SHA256 hash of
/// `{prompt}:{seed}:{duration_secs}:{provider}`. Identical generation
/// parameters always produce the same id.
pub fn compute_artifact_id(prompt: &str, seed: u64, duration_secs: u32, provider: &str) -> String {
    let input = format!("{}:{}:{}:{}", prompt, seed, duration_secs, provider);
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();
    // First 8 bytes (16 hex chars)
    hex::encode(&result[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_id_deterministic() {
        let id1 = compute_artifact_id("gentle rain", 42, 120, "audiogen");
        let id2 = compute_artifact_id("gentle rain", 42, 120, "audiogen");
        assert_eq!(id1, id2);
        assert_eq!(id1.len(), 16);
    }

    #[test]
    fn artifact_id_varies_with_params() {
        let id1 = compute_artifact_id("gentle rain", 42, 120, "audiogen");
        let id2 = compute_artifact_id("gentle rain", 43, 120, "audiogen");
        let id3 = compute_artifact_id("ocean waves", 42, 120, "audiogen");
        let id4 = compute_artifact_id("gentle rain", 42, 120, "bark");
        assert_ne!(id1, id2);
        assert_ne!(id1, id3);
        assert_ne!(id1, id4);
    }

    #[test]
    fn artifact_id_hex_format() {
        let id = compute_artifact_id("test", 0, 60, "bark");
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn request_validation() {
        let ok = GenerationRequest::new("rain".to_string(), 120, ProviderKind::AudioGen, 1);
        assert!(ok.validate().is_none());

        let short = GenerationRequest::new("rain".to_string(), 30, ProviderKind::AudioGen, 1);
        assert!(short.validate().is_some());

        let long = GenerationRequest::new("rain".to_string(), 600, ProviderKind::AudioGen, 1);
        assert!(long.validate().is_some());

        let empty = GenerationRequest::new(String::new(), 120, ProviderKind::AudioGen, 1);
        assert!(empty.validate().is_some());
    }

    #[test]
    fn request_artifact_id_matches_helper() {
        let req = GenerationRequest::new("rain".to_string(), 120, ProviderKind::Bark, 7);
        assert_eq!(
            req.artifact_id(),
            compute_artifact_id("rain", 7, 120, "bark")
        );
    }
}
