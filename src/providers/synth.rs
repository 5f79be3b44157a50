//! Shared synthesis building blocks for the provider implementations.
//!
//! Both backends render their soundscapes from the same small toolbox:
//! a seeded ChaCha stream, a pink noise filter, a one-pole low-pass, and a
//! scheduler for sparse events (thunder, bird calls, beeps). All randomness
//! flows from the request seed, so identical requests render identical audio.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Builds the RNG for a generation run.
///
/// `stream` separates independent random streams derived from one seed
/// (e.g. the event schedule vs. the per-sample noise).
pub fn rng_for(seed: u64, stream: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

/// Soundscape textures the providers know how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texture {
    RainOffice,
    ForestCafe,
    Spaceship,
    Ocean,
    Lofi,
    Ambient,
}

impl Texture {
    /// Maps a generation prompt to a texture by keyword.
    pub fn detect(prompt: &str) -> Self {
        let p = prompt.to_lowercase();

        if p.contains("rain") && p.contains("office") {
            Texture::RainOffice
        } else if p.contains("forest") || p.contains("cafe") {
            Texture::ForestCafe
        } else if p.contains("space") || p.contains("spaceship") || p.contains("spacecraft") {
            Texture::Spaceship
        } else if p.contains("ocean") || p.contains("wave") || p.contains("beach") {
            Texture::Ocean
        } else if p.contains("lofi") || p.contains("coding") || p.contains("night") {
            Texture::Lofi
        } else if p.contains("rain") {
            Texture::RainOffice
        } else if p.contains("zen") || p.contains("meditation") {
            Texture::Ocean
        } else {
            Texture::Ambient
        }
    }
}

/// Pink noise via Paul Kellet's economy filter.
#[derive(Debug, Default, Clone)]
pub struct PinkNoise {
    b0: f32,
    b1: f32,
    b2: f32,
}

impl PinkNoise {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next pink sample, roughly in [-1, 1].
    pub fn next(&mut self, rng: &mut ChaCha8Rng) -> f32 {
        let white: f32 = rng.gen_range(-1.0..1.0);
        self.b0 = 0.99765 * self.b0 + white * 0.099_046;
        self.b1 = 0.96300 * self.b1 + white * 0.296_516_4;
        self.b2 = 0.57000 * self.b2 + white * 1.052_691_3;
        (self.b0 + self.b1 + self.b2 + white * 0.1848) * 0.2
    }
}

/// One-pole low-pass filter.
#[derive(Debug, Clone, Copy)]
pub struct OnePole {
    alpha: f32,
    state: f32,
}

impl OnePole {
    /// Creates a low-pass with the given cutoff.
    pub fn low_pass(cutoff_hz: f32, sample_rate: u32) -> Self {
        let dt = 1.0 / sample_rate as f32;
        let rc = 1.0 / (2.0 * std::f32::consts::PI * cutoff_hz);
        Self {
            alpha: dt / (rc + dt),
            state: 0.0,
        }
    }

    pub fn next(&mut self, input: f32) -> f32 {
        self.state += self.alpha * (input - self.state);
        self.state
    }
}

/// Free-running sine oscillator.
#[derive(Debug, Clone, Copy)]
pub struct SineOsc {
    phase: f32,
    step: f32,
}

impl SineOsc {
    pub fn new(freq_hz: f32, sample_rate: u32) -> Self {
        Self {
            phase: 0.0,
            step: freq_hz * std::f32::consts::TAU / sample_rate as f32,
        }
    }

    pub fn next(&mut self) -> f32 {
        let value = self.phase.sin();
        self.phase = (self.phase + self.step) % std::f32::consts::TAU;
        value
    }
}

/// Draws sparse event start times over a clip.
///
/// The first event lands in `[first_min, first_max]` seconds; subsequent
/// gaps are drawn from `[gap_min, gap_max]`.
pub fn schedule_events(
    rng: &mut ChaCha8Rng,
    duration_secs: f32,
    first_min: f32,
    first_max: f32,
    gap_min: f32,
    gap_max: f32,
) -> Vec<f32> {
    let mut times = Vec::new();
    let mut t = rng.gen_range(first_min..first_max);
    while t < duration_secs {
        times.push(t);
        t += rng.gen_range(gap_min..gap_max);
    }
    times
}

/// Sum of active event envelopes at time `t`.
///
/// Each event contributes `shape(t - start)` while `t - start < length`.
pub fn active_events(times: &[f32], t: f32, length: f32, shape: impl Fn(f32) -> f32) -> f32 {
    times
        .iter()
        .filter(|&&start| t >= start && t < start + length)
        .map(|&start| shape(t - start))
        .sum()
}

/// Hard limiter keeping samples inside the writable range.
pub fn clamp(sample: f32) -> f32 {
    sample.clamp(-0.95, 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_detection() {
        assert_eq!(
            Texture::detect("Gentle rain falling outside a cozy office window"),
            Texture::RainOffice
        );
        assert_eq!(
            Texture::detect("A peaceful cafe nestled in a forest clearing"),
            Texture::ForestCafe
        );
        assert_eq!(
            Texture::detect("spacecraft drifting through deep space"),
            Texture::Spaceship
        );
        assert_eq!(Texture::detect("Waves lapping on a beach"), Texture::Ocean);
        assert_eq!(Texture::detect("late night coding lofi"), Texture::Lofi);
        assert_eq!(Texture::detect("peaceful zen garden"), Texture::Ocean);
        assert_eq!(Texture::detect("droning machinery"), Texture::Ambient);
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let mut a = rng_for(42, 0);
        let mut b = rng_for(42, 0);
        for _ in 0..16 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }

    #[test]
    fn rng_streams_differ() {
        let mut a = rng_for(42, 0);
        let mut b = rng_for(42, 1);
        let same = (0..16).all(|_| a.gen::<u64>() == b.gen::<u64>());
        assert!(!same);
    }

    #[test]
    fn pink_noise_stays_bounded() {
        let mut rng = rng_for(1, 0);
        let mut pink = PinkNoise::new();
        for _ in 0..10_000 {
            let sample = pink.next(&mut rng);
            assert!(sample.abs() <= 1.5, "pink noise escaped range: {}", sample);
        }
    }

    #[test]
    fn event_schedule_is_ordered_and_bounded() {
        let mut rng = rng_for(7, 3);
        let times = schedule_events(&mut rng, 120.0, 5.0, 10.0, 20.0, 40.0);
        assert!(!times.is_empty());
        for pair in times.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(times.iter().all(|&t| t < 120.0));
    }

    #[test]
    fn clamp_limits_range() {
        assert_eq!(clamp(2.0), 0.95);
        assert_eq!(clamp(-2.0), -0.95);
        assert_eq!(clamp(0.5), 0.5);
    }
}
