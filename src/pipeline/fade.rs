//! Fade-in/fade-out stage.

use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::pipeline::Stage;

/// Ramps amplitude linearly from zero over the first `fade_in_ms` and down
/// to zero over the last `fade_out_ms`.
///
/// Ramp lengths are clamped to half the buffer so the two ramps never
/// overlap on very short clips.
#[derive(Debug, Clone, Copy)]
pub struct FadeStage {
    fade_in_ms: u32,
    fade_out_ms: u32,
}

impl FadeStage {
    /// Creates a fade stage with the given ramp lengths in milliseconds.
    pub fn new(fade_in_ms: u32, fade_out_ms: u32) -> Self {
        Self {
            fade_in_ms,
            fade_out_ms,
        }
    }
}

impl Stage for FadeStage {
    fn name(&self) -> &'static str {
        "fade"
    }

    fn apply(&self, mut buffer: AudioBuffer) -> Result<AudioBuffer> {
        let frames = buffer.frames();
        let channels = buffer.channels as usize;
        let rate = buffer.sample_rate as u64;

        let to_frames = |ms: u32| ((ms as u64 * rate) / 1000) as usize;
        let fade_in = to_frames(self.fade_in_ms).min(frames / 2);
        let fade_out = to_frames(self.fade_out_ms).min(frames / 2);

        for i in 0..fade_in {
            let gain = i as f32 / fade_in as f32;
            for sample in &mut buffer.samples[i * channels..(i + 1) * channels] {
                *sample *= gain;
            }
        }

        for i in 0..fade_out {
            let frame = frames - 1 - i;
            let gain = i as f32 / fade_out as f32;
            for sample in &mut buffer.samples[frame * channels..(frame + 1) * channels] {
                *sample *= gain;
            }
        }

        Ok(buffer)
    }
}
