//! Resample stage wrapping the rubato-based converter.

use crate::audio::resample::resample;
use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::pipeline::Stage;

/// Converts the buffer to the configured output sample rate.
///
/// Only included in the stage list when the provider's native rate differs
/// from the output rate.
#[derive(Debug, Clone, Copy)]
pub struct ResampleStage {
    target_rate: u32,
}

impl ResampleStage {
    /// Creates a resample stage targeting the given rate.
    pub fn new(target_rate: u32) -> Self {
        Self { target_rate }
    }
}

impl Stage for ResampleStage {
    fn name(&self) -> &'static str {
        "resample"
    }

    fn apply(&self, buffer: AudioBuffer) -> Result<AudioBuffer> {
        resample(buffer, self.target_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_target_rate() {
        let stage = ResampleStage::new(44_100);
        let out = stage.apply(AudioBuffer::silence(1.0, 24_000, 1)).unwrap();
        assert_eq!(out.sample_rate, 44_100);
    }

    #[test]
    fn matching_rate_is_untouched() {
        let stage = ResampleStage::new(44_100);
        let input = AudioBuffer::new(vec![0.5, -0.5], 44_100, 1);
        let out = stage.apply(input.clone()).unwrap();
        assert_eq!(out, input);
    }
}
