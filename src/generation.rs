//! Generation orchestrator.
//!
//! Runs the complete flow: resolve the mood to a prompt, dispatch the
//! request to the selected provider under a wall-clock budget, post-process
//! the raw audio, and write the artifact. A failure anywhere aborts the run
//! before any file reaches the output directory.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::audio::AudioBuffer;
use crate::config::GenerationConfig;
use crate::error::{FmagError, Result};
use crate::moods::{resolve, ResolvedMood, MIN_CUSTOM_PROMPT_LEN};
use crate::output::OutputWriter;
use crate::pipeline;
use crate::providers::{self, AudioProvider, Availability, ProviderKind};
use crate::types::{GenerationRequest, OutputArtifact, MAX_DURATION_SECS, MIN_DURATION_SECS};

/// Accepted deviation between requested and generated duration in seconds.
pub const DURATION_TOLERANCE_SECS: f32 = 2.0;

/// Coarse progress reported while a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    /// Provider is synthesizing raw audio.
    Generating,
    /// Post-processing pipeline is running.
    Processing,
    /// Artifact is being encoded and written.
    Writing,
}

impl GenerationPhase {
    /// Short human-readable label for progress display.
    pub fn label(&self) -> &'static str {
        match self {
            GenerationPhase::Generating => "Generating audio...",
            GenerationPhase::Processing => "Processing audio...",
            GenerationPhase::Writing => "Writing output...",
        }
    }
}

/// Main generation orchestrator.
///
/// Owns the provider for the duration of one run; `run` consumes the
/// generator since a CLI invocation performs exactly one generation.
pub struct AmbienceGenerator {
    config: GenerationConfig,
    provider: Box<dyn AudioProvider>,
}

impl AmbienceGenerator {
    /// Creates a generator, auto-detecting a provider if none is configured.
    pub fn new(config: GenerationConfig) -> Self {
        let kind = config.provider.unwrap_or_else(providers::auto_detect);
        Self {
            config,
            provider: kind.create(),
        }
    }

    /// Creates a generator with an explicit provider implementation.
    pub fn with_provider(config: GenerationConfig, provider: Box<dyn AudioProvider>) -> Self {
        Self { config, provider }
    }

    /// Returns the provider this generator will dispatch to.
    pub fn provider(&self) -> &dyn AudioProvider {
        self.provider.as_ref()
    }

    /// Validates the configuration before generation.
    ///
    /// Returns all problems found; an empty list means the run can proceed.
    pub fn validate(&self) -> Vec<FmagError> {
        let mut errors = Vec::new();

        if let ResolvedMood::Custom(text) = resolve(&self.config.mood) {
            if text.trim().len() < MIN_CUSTOM_PROMPT_LEN {
                errors.push(FmagError::unknown_mood(text));
            }
        }

        if let Some(minutes) = self.config.duration_min {
            if !(1..=5).contains(&minutes) {
                errors.push(FmagError::invalid_duration(minutes * 60));
            }
        }

        if let Availability::Unavailable(reason) = self.provider.probe() {
            errors.push(FmagError::provider_unavailable(
                self.provider.name(),
                format!("{}\n{}", reason, self.provider.config_help()),
            ));
        }

        errors
    }

    /// Runs the full generation flow and returns the written artifact.
    pub fn run(self) -> Result<OutputArtifact> {
        self.run_with_progress(|_| {})
    }

    /// Runs the full generation flow, reporting phase transitions.
    pub fn run_with_progress(
        self,
        on_phase: impl Fn(GenerationPhase),
    ) -> Result<OutputArtifact> {
        let resolved = resolve(&self.config.mood);
        if let ResolvedMood::Custom(text) = resolved {
            if text.trim().len() < MIN_CUSTOM_PROMPT_LEN {
                return Err(FmagError::unknown_mood(text));
            }
        }

        let minutes = self
            .config
            .duration_min
            .unwrap_or_else(|| resolved.default_duration_min());
        let duration_secs = minutes * 60;
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&duration_secs) {
            return Err(FmagError::invalid_duration(duration_secs));
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let request = GenerationRequest::new(
            resolved.prompt(),
            duration_secs,
            self.provider.kind(),
            seed,
        );
        let slug = resolved.slug();
        let artifact_id = request.artifact_id();

        tracing::debug!(
            provider = self.provider.name(),
            slug,
            duration_secs,
            seed,
            artifact_id,
            "starting generation"
        );

        on_phase(GenerationPhase::Generating);
        let raw = dispatch_with_timeout(self.provider, request, self.config.timeout_ms)?;

        let actual_secs = raw.duration_secs();
        if (actual_secs - duration_secs as f32).abs() > DURATION_TOLERANCE_SECS {
            return Err(FmagError::duration_mismatch(duration_secs, actual_secs));
        }

        on_phase(GenerationPhase::Processing);
        let stages = pipeline::build_stages(&self.config.pipeline, raw.sample_rate);
        let processed = pipeline::run(raw, &stages)?;

        on_phase(GenerationPhase::Writing);
        let writer = OutputWriter::new(self.config.effective_output_dir(), self.config.format);
        writer.write(&processed, slug, &artifact_id)
    }
}

/// Runs provider generation on a worker thread bounded by the wall-clock
/// budget.
///
/// A timeout abandons the worker and fails the run; the abandoned thread
/// holds no resources beyond its buffer, which is dropped when it finishes.
fn dispatch_with_timeout(
    provider: Box<dyn AudioProvider>,
    request: GenerationRequest,
    timeout_ms: u64,
) -> Result<AudioBuffer> {
    let provider_name = provider.name();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let _ = tx.send(provider.generate(&request));
    });

    match rx.recv_timeout(Duration::from_millis(timeout_ms)) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            Err(FmagError::generation_timeout(provider_name, timeout_ms))
        }
        Err(RecvTimeoutError::Disconnected) => Err(FmagError::provider_unavailable(
            provider_name,
            "generation thread terminated unexpectedly",
        )),
    }
}

/// One-call helper for simple generation.
pub fn quick_generate(
    mood: &str,
    duration_min: Option<u32>,
    provider: Option<ProviderKind>,
    output_dir: Option<std::path::PathBuf>,
) -> Result<OutputArtifact> {
    let mut config = GenerationConfig::new(mood).apply_env();
    config.duration_min = duration_min;
    if provider.is_some() {
        config.provider = provider;
    }
    if output_dir.is_some() {
        config.output_dir = output_dir;
    }

    AmbienceGenerator::new(config).run()
}
