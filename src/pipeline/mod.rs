//! Post-processing pipeline.
//!
//! The pipeline is an explicit ordered list of stages built from
//! configuration, then folded over the buffer: resample (when the provider's
//! native rate differs from the output rate), fade-in/out, loop-crossfade,
//! and peak normalization, in that order. Every stage is a pure transform
//! that consumes its input buffer and returns a new one.

pub mod crossfade;
pub mod fade;
pub mod normalize;
pub mod resample;

pub use crossfade::{CrossfadeCurve, LoopCrossfadeStage};
pub use fade::FadeStage;
pub use normalize::NormalizeStage;
pub use resample::ResampleStage;

use crate::audio::AudioBuffer;
use crate::config::PipelineConfig;
use crate::error::Result;

/// A single post-processing transform.
///
/// Stages own no state beyond their parameters and must not reorder samples
/// outside their declared transform.
pub trait Stage {
    /// Short stage name for diagnostics.
    fn name(&self) -> &'static str;

    /// Applies the transform, consuming the input buffer.
    fn apply(&self, buffer: AudioBuffer) -> Result<AudioBuffer>;
}

/// Builds the ordered stage list for a generation run.
///
/// Disabled stages are omitted from the list rather than branched around at
/// run time; normalization is always present and always last.
pub fn build_stages(config: &PipelineConfig, native_rate: u32) -> Vec<Box<dyn Stage>> {
    let mut stages: Vec<Box<dyn Stage>> = Vec::new();

    if native_rate != config.sample_rate {
        stages.push(Box::new(ResampleStage::new(config.sample_rate)));
    }

    if config.fade_in_ms > 0 || config.fade_out_ms > 0 {
        stages.push(Box::new(FadeStage::new(config.fade_in_ms, config.fade_out_ms)));
    }

    if config.loop_optimize {
        stages.push(Box::new(LoopCrossfadeStage::new(
            config.crossfade_ms,
            config.crossfade_curve,
        )));
    }

    stages.push(Box::new(NormalizeStage::new(config.normalize_target_dbfs)));

    stages
}

/// Runs a buffer through the stage list in order.
pub fn run(mut buffer: AudioBuffer, stages: &[Box<dyn Stage>]) -> Result<AudioBuffer> {
    for stage in stages {
        let before_ms = buffer.duration_ms();
        buffer = stage.apply(buffer)?;
        tracing::debug!(
            stage = stage.name(),
            before_ms,
            after_ms = buffer.duration_ms(),
            "pipeline stage applied"
        );
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stage that returns its input untouched.
    struct IdentityStage;

    impl Stage for IdentityStage {
        fn name(&self) -> &'static str {
            "identity"
        }

        fn apply(&self, buffer: AudioBuffer) -> Result<AudioBuffer> {
            Ok(buffer)
        }
    }

    fn test_tone(duration_secs: f32) -> AudioBuffer {
        let rate = 44_100u32;
        let frames = (duration_secs * rate as f32) as usize;
        let samples: Vec<f32> = (0..frames)
            .map(|i| (i as f32 * 220.0 * 2.0 * std::f32::consts::PI / rate as f32).sin() * 0.5)
            .collect();
        AudioBuffer::new(samples, rate, 1)
    }

    #[test]
    fn default_stage_order() {
        let config = PipelineConfig::default();
        let stages = build_stages(&config, config.sample_rate);
        let names: Vec<&str> = stages.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["fade", "loop-crossfade", "normalize"]);
    }

    #[test]
    fn resample_included_when_rates_differ() {
        let config = PipelineConfig::default();
        let stages = build_stages(&config, 24_000);
        assert_eq!(stages[0].name(), "resample");
    }

    #[test]
    fn disabled_stages_are_omitted() {
        let mut config = PipelineConfig::default();
        config.fade_in_ms = 0;
        config.fade_out_ms = 0;
        config.loop_optimize = false;

        let stages = build_stages(&config, config.sample_rate);
        let names: Vec<&str> = stages.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["normalize"]);
    }

    #[test]
    fn normalize_is_always_last() {
        let config = PipelineConfig::default();
        for native_rate in [24_000, 44_100] {
            let stages = build_stages(&config, native_rate);
            assert_eq!(stages.last().unwrap().name(), "normalize");
        }
    }

    #[test]
    fn disabled_fade_matches_identity_stub() {
        // A pipeline with fades disabled must produce output byte-identical
        // to one where the fade stage is replaced by an identity transform.
        let mut config = PipelineConfig::default();
        config.fade_in_ms = 0;
        config.fade_out_ms = 0;

        let disabled = build_stages(&config, config.sample_rate);

        let stubbed: Vec<Box<dyn Stage>> = vec![
            Box::new(IdentityStage),
            Box::new(LoopCrossfadeStage::new(
                config.crossfade_ms,
                config.crossfade_curve,
            )),
            Box::new(NormalizeStage::new(config.normalize_target_dbfs)),
        ];

        let input = test_tone(10.0);
        let a = run(input.clone(), &disabled).unwrap();
        let b = run(input, &stubbed).unwrap();
        assert_eq!(a.samples, b.samples);
    }

    #[test]
    fn pipeline_trims_by_crossfade_window() {
        let config = PipelineConfig::default();
        let stages = build_stages(&config, 44_100);

        let input = test_tone(10.0);
        let input_frames = input.frames();
        let output = run(input, &stages).unwrap();

        let window_frames = (config.crossfade_ms as usize * 44_100) / 1000;
        assert_eq!(output.frames(), input_frames - window_frames);
    }
}
