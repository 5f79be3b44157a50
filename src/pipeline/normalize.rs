//! Peak normalization stage.

use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::pipeline::Stage;

/// Scales amplitude so the peak reaches the target level in dBFS.
///
/// The convention is peak (not RMS) normalization, held fixed across the
/// crate. Silent buffers pass through unchanged; a sub-zero-dBFS target can
/// never clip.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeStage {
    target_dbfs: f32,
}

impl NormalizeStage {
    /// Creates a normalization stage targeting the given peak level.
    pub fn new(target_dbfs: f32) -> Self {
        Self { target_dbfs }
    }

    /// Returns the target peak as a linear amplitude.
    pub fn target_amplitude(&self) -> f32 {
        10f32.powf(self.target_dbfs / 20.0)
    }
}

impl Stage for NormalizeStage {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn apply(&self, mut buffer: AudioBuffer) -> Result<AudioBuffer> {
        let peak = buffer.peak();
        if peak == 0.0 {
            return Ok(buffer);
        }

        let gain = self.target_amplitude() / peak;
        for sample in &mut buffer.samples {
            *sample *= gain;
        }

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_reaches_target() {
        let stage = NormalizeStage::new(-1.0);
        let buffer = AudioBuffer::new(vec![0.1, -0.2, 0.05], 44_100, 1);
        let out = stage.apply(buffer).unwrap();
        assert!((out.peak() - stage.target_amplitude()).abs() < 1e-5);
    }

    #[test]
    fn quiet_audio_is_amplified() {
        let stage = NormalizeStage::new(-1.0);
        let out = stage
            .apply(AudioBuffer::new(vec![0.01, -0.01], 44_100, 1))
            .unwrap();
        assert!(out.peak() > 0.5);
    }

    #[test]
    fn loud_audio_is_attenuated_below_clipping() {
        let stage = NormalizeStage::new(-1.0);
        let out = stage
            .apply(AudioBuffer::new(vec![1.5, -1.2], 44_100, 1))
            .unwrap();
        assert!(out.peak() < 1.0);
    }

    #[test]
    fn idempotent_within_epsilon() {
        let stage = NormalizeStage::new(-1.0);
        let once = stage
            .apply(AudioBuffer::new(vec![0.3, -0.7, 0.4], 44_100, 1))
            .unwrap();
        let peak_once = once.peak();
        let twice = stage.apply(once).unwrap();
        assert!((twice.peak() - peak_once).abs() < 1e-4);
    }

    #[test]
    fn silence_passes_through() {
        let stage = NormalizeStage::new(-1.0);
        let silence = AudioBuffer::silence(1.0, 44_100, 1);
        let out = stage.apply(silence.clone()).unwrap();
        assert_eq!(out.samples, silence.samples);
    }
}
