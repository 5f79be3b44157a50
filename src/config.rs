//! Generation configuration.
//!
//! Runtime configuration for a generation run, including provider and
//! format selection, pipeline defaults, and path configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pipeline::CrossfadeCurve;
use crate::providers::ProviderKind;
use crate::types::AudioFormat;

/// Default generation timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default fade-in/fade-out length in milliseconds.
pub const DEFAULT_FADE_MS: u32 = 1_500;

/// Default loop-crossfade window in milliseconds.
pub const DEFAULT_CROSSFADE_MS: u32 = 1_000;

/// Default peak normalization target in dBFS.
pub const DEFAULT_NORMALIZE_TARGET_DBFS: f32 = -1.0;

/// Post-processing pipeline configuration.
///
/// A fade length of zero disables the corresponding ramp; setting both to
/// zero removes the fade stage entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fade-in length in milliseconds.
    pub fade_in_ms: u32,

    /// Fade-out length in milliseconds.
    pub fade_out_ms: u32,

    /// Whether to splice a loop-crossfade for seamless playback.
    pub loop_optimize: bool,

    /// Loop-crossfade window in milliseconds.
    pub crossfade_ms: u32,

    /// Amplitude curve used for the loop-crossfade.
    pub crossfade_curve: CrossfadeCurve,

    /// Output sample rate; provider output is resampled to this.
    pub sample_rate: u32,

    /// Peak normalization target in dBFS. Normalization is always applied.
    pub normalize_target_dbfs: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fade_in_ms: DEFAULT_FADE_MS,
            fade_out_ms: DEFAULT_FADE_MS,
            loop_optimize: true,
            crossfade_ms: DEFAULT_CROSSFADE_MS,
            crossfade_curve: CrossfadeCurve::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            normalize_target_dbfs: DEFAULT_NORMALIZE_TARGET_DBFS,
        }
    }
}

/// Runtime configuration for a generation run.
///
/// Typically built from command-line arguments, with environment variables
/// filling in anything the arguments leave unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Mood preset name or free-form prompt.
    pub mood: String,

    /// Duration in minutes (1-5). If None, uses the preset's default.
    pub duration_min: Option<u32>,

    /// Provider to use. If None, the best available provider is detected.
    pub provider: Option<ProviderKind>,

    /// Directory for generated files.
    /// If None, uses the platform-specific default location.
    pub output_dir: Option<PathBuf>,

    /// Output encoding.
    pub format: AudioFormat,

    /// Seed for reproducible generation. If None, a random seed is drawn.
    pub seed: Option<u64>,

    /// Wall-clock budget for provider generation in milliseconds.
    pub timeout_ms: u64,

    /// Post-processing configuration.
    pub pipeline: PipelineConfig,
}

impl GenerationConfig {
    /// Creates a configuration for the given mood with default values.
    pub fn new(mood: impl Into<String>) -> Self {
        Self {
            mood: mood.into(),
            duration_min: None,
            provider: None,
            output_dir: None,
            format: AudioFormat::default(),
            seed: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            pipeline: PipelineConfig::default(),
        }
    }

    /// Fills the configuration from environment variables.
    ///
    /// Reads the following variables:
    /// - `FMAG_OUTPUT_DIR` - Output directory
    /// - `FMAG_PROVIDER` - Provider name (audiogen, bark)
    /// - `FMAG_FORMAT` - Output format (mp3, wav)
    /// - `FMAG_TIMEOUT_MS` - Generation timeout in milliseconds
    /// - `FMAG_SAMPLE_RATE` - Output sample rate in Hz
    ///
    /// Callers apply explicit command-line values after this, so flags win
    /// over the environment.
    pub fn apply_env(mut self) -> Self {
        if self.output_dir.is_none() {
            if let Ok(dir) = std::env::var("FMAG_OUTPUT_DIR") {
                self.output_dir = Some(PathBuf::from(dir));
            }
        }

        if self.provider.is_none() {
            if let Ok(name) = std::env::var("FMAG_PROVIDER") {
                if let Some(kind) = ProviderKind::parse(&name) {
                    self.provider = Some(kind);
                }
            }
        }

        if let Ok(format) = std::env::var("FMAG_FORMAT") {
            if let Some(format) = AudioFormat::parse(&format) {
                self.format = format;
            }
        }

        if let Ok(timeout) = std::env::var("FMAG_TIMEOUT_MS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                if timeout > 0 {
                    self.timeout_ms = timeout;
                }
            }
        }

        if let Ok(rate) = std::env::var("FMAG_SAMPLE_RATE") {
            if let Ok(rate) = rate.parse::<u32>() {
                if (8_000..=192_000).contains(&rate) {
                    self.pipeline.sample_rate = rate;
                }
            }
        }

        self
    }

    /// Returns the effective output directory, using the platform default
    /// if not specified.
    pub fn effective_output_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.output_dir {
            dir.clone()
        } else {
            default_output_dir()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.mood.trim().is_empty() {
            return Some("mood cannot be empty".to_string());
        }

        if let Some(minutes) = self.duration_min {
            if !(1..=5).contains(&minutes) {
                return Some(format!(
                    "duration must be between 1 and 5 minutes, got {}",
                    minutes
                ));
            }
        }

        if self.timeout_ms == 0 {
            return Some("timeout must be > 0".to_string());
        }

        if self.pipeline.loop_optimize && self.pipeline.crossfade_ms == 0 {
            return Some("crossfade window must be > 0 when loop optimization is on".to_string());
        }

        None
    }
}

/// Returns the platform-specific default output directory.
///
/// - macOS: ~/Library/Application Support/fmag/output
/// - Linux: ~/.local/share/fmag/output
/// - Windows: C:\Users\<user>\AppData\Roaming\fmag\data\output
fn default_output_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "fmag") {
        proj_dirs.data_dir().join("output")
    } else {
        PathBuf::from("./output")
    }
}
