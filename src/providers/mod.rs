//! Audio generation providers.
//!
//! Every backend implements [`AudioProvider`], a uniform contract: given a
//! prompt and a duration, return raw audio samples at the provider's native
//! rate. Providers are selected by name through [`ProviderKind`], which acts
//! as the registry.
//!
//! - [`audiogen`]: OpenAI-style backend, stereo 44.1kHz
//! - [`bark`]: Bark-style backend, mono 24kHz

pub mod audiogen;
pub mod bark;
pub mod synth;

pub use audiogen::AudioGenProvider;
pub use bark::BarkProvider;

use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::types::GenerationRequest;

/// Result of a provider capability probe.
///
/// The probe is cheap: it checks for required external dependencies without
/// running a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Provider can be used.
    Ready,
    /// Provider cannot be used; the string explains why.
    Unavailable(String),
}

impl Availability {
    /// Returns true if the provider is ready to generate.
    pub fn is_ready(&self) -> bool {
        matches!(self, Availability::Ready)
    }
}

/// Uniform contract for audio generation backends.
///
/// Implementations must return audio whose duration is within tolerance of
/// the request; the orchestrator rejects anything else. Wall-clock limits
/// are enforced by the caller, so `generate` may simply block.
pub trait AudioProvider: Send {
    /// The registry entry this provider implements.
    fn kind(&self) -> ProviderKind;

    /// One-line description for the listing command.
    fn description(&self) -> &'static str;

    /// Sample rate of generated audio in Hz.
    fn native_sample_rate(&self) -> u32;

    /// Channel count of generated audio.
    fn native_channels(&self) -> u16;

    /// Checks whether this provider is available and configured.
    fn probe(&self) -> Availability;

    /// Generates audio from the request's prompt.
    fn generate(&self, request: &GenerationRequest) -> Result<AudioBuffer>;

    /// Human-readable configuration instructions.
    fn config_help(&self) -> String {
        format!("No special configuration needed for {}", self.name())
    }

    /// Registry name of this provider.
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Registered generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI-style audio generation. Stereo output at 44.1kHz.
    #[default]
    AudioGen,

    /// Bark open-source audio generation. Mono output at 24kHz.
    Bark,
}

impl ProviderKind {
    /// Returns the string representation of the provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::AudioGen => "audiogen",
            ProviderKind::Bark => "bark",
        }
    }

    /// Parses a provider from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "audiogen" | "audio_gen" => Some(ProviderKind::AudioGen),
            "bark" => Some(ProviderKind::Bark),
            _ => None,
        }
    }

    /// Returns all registered providers in listing order.
    pub fn all() -> &'static [ProviderKind] {
        &[ProviderKind::AudioGen, ProviderKind::Bark]
    }

    /// Builds the implementation for this provider.
    pub fn create(&self) -> Box<dyn AudioProvider> {
        match self {
            ProviderKind::AudioGen => Box::new(AudioGenProvider::new()),
            ProviderKind::Bark => Box::new(BarkProvider::new()),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A provider row for the `providers` listing command.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    /// Registry name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Result of the capability probe.
    pub available: bool,
}

/// Lists all registered providers with their probed availability.
pub fn list_providers() -> Vec<ProviderInfo> {
    ProviderKind::all()
        .iter()
        .map(|kind| {
            let provider = kind.create();
            ProviderInfo {
                name: provider.name(),
                description: provider.description(),
                available: provider.probe().is_ready(),
            }
        })
        .collect()
}

/// Auto-detects the best available provider.
///
/// An OpenAI API key in the environment selects AudioGen; otherwise the
/// first provider whose probe succeeds wins, falling back to the default.
pub fn auto_detect() -> ProviderKind {
    if std::env::var("OPENAI_API_KEY").is_ok() {
        tracing::debug!("auto-detected audiogen via OPENAI_API_KEY");
        return ProviderKind::AudioGen;
    }

    for kind in ProviderKind::all() {
        if kind.create().probe().is_ready() {
            tracing::debug!(provider = kind.as_str(), "auto-detected provider");
            return *kind;
        }
    }

    ProviderKind::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parsing() {
        assert_eq!(ProviderKind::parse("audiogen"), Some(ProviderKind::AudioGen));
        assert_eq!(ProviderKind::parse("AudioGen"), Some(ProviderKind::AudioGen));
        assert_eq!(ProviderKind::parse("audio-gen"), Some(ProviderKind::AudioGen));
        assert_eq!(ProviderKind::parse("bark"), Some(ProviderKind::Bark));
        assert_eq!(ProviderKind::parse("invalid"), None);
    }

    #[test]
    fn provider_display() {
        assert_eq!(ProviderKind::AudioGen.to_string(), "audiogen");
        assert_eq!(ProviderKind::Bark.to_string(), "bark");
    }

    #[test]
    fn registry_covers_all_kinds() {
        for kind in ProviderKind::all() {
            let provider = kind.create();
            assert_eq!(provider.kind(), *kind);
            assert_eq!(provider.name(), kind.as_str());
            assert!(!provider.description().is_empty());
            assert!(provider.native_sample_rate() > 0);
            assert!(provider.native_channels() > 0);
        }
    }

    #[test]
    fn listing_has_one_row_per_provider() {
        let rows = list_providers();
        assert_eq!(rows.len(), ProviderKind::all().len());
        assert_eq!(rows[0].name, "audiogen");
        assert_eq!(rows[1].name, "bark");
    }

    #[test]
    fn auto_detect_returns_registered_kind() {
        let kind = auto_detect();
        assert!(ProviderKind::all().contains(&kind));
    }
}
