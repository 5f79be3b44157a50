//! Bark provider.
//!
//! Bark-style open-source text-to-audio backend. Output is mono at 24kHz,
//! Bark's native rate; the pipeline resamples it to the output rate. The
//! rendering favors darker, more muffled textures than AudioGen.

use rand::Rng;

use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::providers::synth::{
    active_events, clamp, rng_for, schedule_events, OnePole, PinkNoise, SineOsc, Texture,
};
use crate::providers::{AudioProvider, Availability, ProviderKind};
use crate::types::GenerationRequest;

const SAMPLE_RATE: u32 = 24_000;
const CHANNELS: u16 = 1;

/// Audio generation provider using Bark-style synthesis.
pub struct BarkProvider;

impl BarkProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BarkProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioProvider for BarkProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bark
    }

    fn description(&self) -> &'static str {
        "Bark open-source audio generation"
    }

    fn native_sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn native_channels(&self) -> u16 {
        CHANNELS
    }

    fn probe(&self) -> Availability {
        Availability::Ready
    }

    fn config_help(&self) -> String {
        "Bark Configuration:\n\
         \x20 No API key required; generation runs locally.\n\
         \x20 Environment variables:\n\
         \x20   FMAG_PROVIDER=bark  Select Bark without --provider"
            .to_string()
    }

    fn generate(&self, request: &GenerationRequest) -> Result<AudioBuffer> {
        // Bark has no generic-ambient voice; fall back to the forest set.
        let texture = match Texture::detect(&request.prompt) {
            Texture::Ambient => Texture::ForestCafe,
            texture => texture,
        };
        tracing::debug!(
            provider = self.name(),
            ?texture,
            duration_secs = request.duration_secs,
            seed = request.seed,
            "rendering soundscape"
        );

        let samples = match texture {
            Texture::RainOffice => render_rain(request.duration_secs, request.seed),
            Texture::Spaceship => render_space(request.duration_secs, request.seed),
            Texture::Ocean => render_ocean(request.duration_secs, request.seed),
            Texture::Lofi => render_lofi(request.duration_secs, request.seed),
            Texture::ForestCafe | Texture::Ambient => {
                render_forest(request.duration_secs, request.seed)
            }
        };

        Ok(AudioBuffer::new(samples, SAMPLE_RATE, CHANNELS))
    }
}

fn frame_count(duration_secs: u32) -> usize {
    duration_secs as usize * SAMPLE_RATE as usize
}

fn render_rain(duration_secs: u32, seed: u64) -> Vec<f32> {
    let mut rng = rng_for(seed, 11);
    let mut rain = PinkNoise::new();
    let mut filter = OnePole::low_pass(2_000.0, SAMPLE_RATE);

    (0..frame_count(duration_secs))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let mut sample = filter.next(rain.next(&mut rng)) * 0.6;
            if rng.gen::<f32>() < 2e-4 {
                sample += rng.gen_range(-0.2..0.2);
            }
            sample *= 0.75 + 0.25 * (t * 0.03).sin();
            clamp(sample)
        })
        .collect()
}

fn render_forest(duration_secs: u32, seed: u64) -> Vec<f32> {
    let duration = duration_secs as f32;
    let mut schedule_rng = rng_for(seed, 10);
    let bird_times = schedule_events(&mut schedule_rng, duration, 2.0, 6.0, 3.0, 9.0);

    let mut rng = rng_for(seed, 11);
    let mut canopy = PinkNoise::new();
    let mut canopy_filter = OnePole::low_pass(350.0, SAMPLE_RATE);

    (0..frame_count(duration_secs))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let wind = canopy_filter.next(canopy.next(&mut rng)) * (0.6 + 0.4 * (t * 0.04).sin());
            let birds = active_events(&bird_times, t, 0.3, |tt| {
                let env = (std::f32::consts::PI * tt / 0.3).sin().powi(2);
                env * ((2_000.0 * tt + 900.0 * tt * tt) * std::f32::consts::TAU).sin() * 0.1
            });
            clamp(wind * 0.7 + birds)
        })
        .collect()
}

fn render_space(duration_secs: u32, seed: u64) -> Vec<f32> {
    let mut rng = rng_for(seed, 11);
    let mut drone_a = SineOsc::new(48.0, SAMPLE_RATE);
    let mut drone_b = SineOsc::new(48.4, SAMPLE_RATE);
    let mut hiss = PinkNoise::new();
    let mut hiss_filter = OnePole::low_pass(500.0, SAMPLE_RATE);

    (0..frame_count(duration_secs))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let drone = (drone_a.next() + drone_b.next()) * 0.15 * (0.85 + 0.15 * (t * 0.05).sin());
            let air = hiss_filter.next(hiss.next(&mut rng)) * 0.08;
            clamp(drone + air)
        })
        .collect()
}

fn render_ocean(duration_secs: u32, seed: u64) -> Vec<f32> {
    let mut rng = rng_for(seed, 11);
    let mut surf = PinkNoise::new();
    let mut surf_filter = OnePole::low_pass(450.0, SAMPLE_RATE);

    (0..frame_count(duration_secs))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let swell = 0.5 + 0.5 * (t * 0.07 * std::f32::consts::TAU).sin();
            clamp(surf_filter.next(surf.next(&mut rng)) * swell * swell * 1.1)
        })
        .collect()
}

fn render_lofi(duration_secs: u32, seed: u64) -> Vec<f32> {
    const BPM: f32 = 68.0;
    let beat = 60.0 / BPM;
    let bar = 4.0 * beat;
    let bass_notes = [49.0f32, 36.7, 43.7, 32.7];

    let mut rng = rng_for(seed, 11);
    let mut crackle = PinkNoise::new();

    (0..frame_count(duration_secs))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let bar_t = t % bar;

            let mut sample = 0.0;
            for kick_at in [0.0, 2.0 * beat] {
                let tt = bar_t - kick_at;
                if (0.0..0.3).contains(&tt) {
                    sample += (tt * 50.0 * std::f32::consts::TAU).sin() * (-tt * 18.0).exp() * 0.45;
                }
            }

            let note_t = t % (2.0 * beat);
            let note = bass_notes[((t / (2.0 * beat)) as usize) % bass_notes.len()];
            let env = (note_t * 15.0).min(1.0) * ((2.0 * beat - note_t) * 15.0).min(1.0);
            sample += (t * note * std::f32::consts::TAU).sin() * env * 0.15;

            sample += crackle.next(&mut rng) * 0.05;
            if rng.gen::<f32>() < 2e-4 {
                sample += rng.gen_range(-0.2..0.2);
            }

            clamp(sample)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str, duration_secs: u32, seed: u64) -> GenerationRequest {
        GenerationRequest::new(prompt.to_string(), duration_secs, ProviderKind::Bark, seed)
    }

    #[test]
    fn generates_mono_at_native_rate() {
        let provider = BarkProvider::new();
        let buffer = provider.generate(&request("ocean waves on a beach", 60, 5)).unwrap();
        assert_eq!(buffer.sample_rate, 24_000);
        assert_eq!(buffer.channels, 1);
        assert!((buffer.duration_secs() - 60.0).abs() < 0.01);
    }

    #[test]
    fn unmatched_prompt_falls_back_to_forest_voice() {
        let provider = BarkProvider::new();
        let buffer = provider.generate(&request("indistinct murmuring texture", 60, 5)).unwrap();
        assert!(buffer.peak() > 0.0);
    }

    #[test]
    fn generation_is_deterministic_for_seed() {
        let provider = BarkProvider::new();
        let a = provider.generate(&request("night coding lofi", 60, 9)).unwrap();
        let b = provider.generate(&request("night coding lofi", 60, 9)).unwrap();
        assert_eq!(a.samples, b.samples);
    }

    #[test]
    fn output_stays_in_range() {
        let provider = BarkProvider::new();
        for prompt in ["rainfall", "forest cafe", "deep space hum", "ocean waves", "lofi beats"] {
            let buffer = provider.generate(&request(prompt, 60, 2)).unwrap();
            assert!(buffer.peak() <= 0.95, "clipped output for {:?}", prompt);
        }
    }
}
