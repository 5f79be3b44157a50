//! Loop-crossfade stage.
//!
//! Blends the tail of the clip into its head and trims the tail off, so
//! repeated playback has no audible seam: the trimmed end flows directly
//! into the blended start.

use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::{FmagError, Result};
use crate::pipeline::Stage;

/// Amplitude curve used to blend head and tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CrossfadeCurve {
    /// Constant-power sine/cosine blend; preserves perceived loudness.
    #[default]
    EqualPower,

    /// Straight linear ramps.
    Linear,
}

impl CrossfadeCurve {
    /// Returns (head_gain, tail_gain) at blend position `t` in [0, 1].
    ///
    /// At t=0 the tail dominates (continuing the clip's end); at t=1 the
    /// head has fully taken over.
    fn gains(&self, t: f32) -> (f32, f32) {
        match self {
            CrossfadeCurve::EqualPower => {
                let angle = t * std::f32::consts::FRAC_PI_2;
                (angle.sin(), angle.cos())
            }
            CrossfadeCurve::Linear => (t, 1.0 - t),
        }
    }
}

/// Splices the last `window_ms` of audio into the first `window_ms` and
/// shortens the buffer by the window length.
///
/// Precondition: the buffer must be strictly longer than twice the window.
#[derive(Debug, Clone, Copy)]
pub struct LoopCrossfadeStage {
    window_ms: u32,
    curve: CrossfadeCurve,
}

impl LoopCrossfadeStage {
    /// Creates a loop-crossfade stage with the given window and curve.
    pub fn new(window_ms: u32, curve: CrossfadeCurve) -> Self {
        Self { window_ms, curve }
    }
}

impl Stage for LoopCrossfadeStage {
    fn name(&self) -> &'static str {
        "loop-crossfade"
    }

    fn apply(&self, buffer: AudioBuffer) -> Result<AudioBuffer> {
        let frames = buffer.frames();
        let channels = buffer.channels as usize;
        let window = ((self.window_ms as u64 * buffer.sample_rate as u64) / 1000) as usize;

        if frames <= 2 * window {
            return Err(FmagError::buffer_too_short(
                buffer.duration_ms(),
                self.window_ms,
            ));
        }

        let out_frames = frames - window;
        let mut samples = Vec::with_capacity(out_frames * channels);

        // Blend region: head gains in, tail gains out
        for i in 0..window {
            let t = i as f32 / window as f32;
            let (head_gain, tail_gain) = self.curve.gains(t);
            let head = &buffer.samples[i * channels..(i + 1) * channels];
            let tail_frame = frames - window + i;
            let tail = &buffer.samples[tail_frame * channels..(tail_frame + 1) * channels];
            for (h, t_sample) in head.iter().zip(tail) {
                samples.push(h * head_gain + t_sample * tail_gain);
            }
        }

        // Untouched middle, up to where the consumed tail began
        samples.extend_from_slice(&buffer.samples[window * channels..out_frames * channels]);

        Ok(AudioBuffer::new(samples, buffer.sample_rate, buffer.channels))
    }
}
