//! AudioGen provider.
//!
//! OpenAI-style audio generation backend. This implementation synthesizes
//! the requested soundscape locally from layered noise and oscillator
//! voices; swap the rendering for actual API calls when integrating with a
//! hosted audio generation service.

use rand::Rng;

use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::providers::synth::{
    active_events, clamp, rng_for, schedule_events, OnePole, PinkNoise, SineOsc, Texture,
};
use crate::providers::{AudioProvider, Availability, ProviderKind};
use crate::types::GenerationRequest;

const SAMPLE_RATE: u32 = 44_100;
const CHANNELS: u16 = 2;

/// Audio generation provider using OpenAI-style APIs.
pub struct AudioGenProvider;

impl AudioGenProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AudioGenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioProvider for AudioGenProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AudioGen
    }

    fn description(&self) -> &'static str {
        "OpenAI-compatible audio generation"
    }

    fn native_sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn native_channels(&self) -> u16 {
        CHANNELS
    }

    fn probe(&self) -> Availability {
        // The synthesis engine is self-contained; an API key only biases
        // auto-detection toward this provider.
        Availability::Ready
    }

    fn config_help(&self) -> String {
        "AudioGen Configuration:\n\
         \x20 Set OPENAI_API_KEY to prefer this provider during auto-detection:\n\
         \x20   export OPENAI_API_KEY='your-api-key'"
            .to_string()
    }

    fn generate(&self, request: &GenerationRequest) -> Result<AudioBuffer> {
        let texture = Texture::detect(&request.prompt);
        tracing::debug!(
            provider = self.name(),
            ?texture,
            duration_secs = request.duration_secs,
            seed = request.seed,
            "rendering soundscape"
        );

        let samples = match texture {
            Texture::RainOffice => render_rain_office(request.duration_secs, request.seed),
            Texture::ForestCafe => render_forest_cafe(request.duration_secs, request.seed),
            Texture::Spaceship => render_spaceship(request.duration_secs, request.seed),
            Texture::Ocean => render_ocean(request.duration_secs, request.seed),
            Texture::Lofi => render_lofi(request.duration_secs, request.seed),
            Texture::Ambient => render_ambient(request.duration_secs, request.seed),
        };

        Ok(AudioBuffer::new(samples, SAMPLE_RATE, CHANNELS))
    }
}

/// Widens a mono voice into decorrelated stereo and clamps both channels.
struct StereoSpread {
    left: PinkNoise,
    right: PinkNoise,
}

impl StereoSpread {
    fn new() -> Self {
        Self {
            left: PinkNoise::new(),
            right: PinkNoise::new(),
        }
    }

    fn push(&mut self, samples: &mut Vec<f32>, rng: &mut rand_chacha::ChaCha8Rng, sample: f32) {
        samples.push(clamp(sample + self.left.next(rng) * 0.05));
        samples.push(clamp(sample + self.right.next(rng) * 0.05));
    }
}

fn render_rain_office(duration_secs: u32, seed: u64) -> Vec<f32> {
    let duration = duration_secs as f32;
    let mut schedule_rng = rng_for(seed, 1);
    let thunder_times = schedule_events(&mut schedule_rng, duration, 15.0, 30.0, 25.0, 45.0);

    let mut rng = rng_for(seed, 2);
    let mut rain = PinkNoise::new();
    let mut rumble = PinkNoise::new();
    let mut spread = StereoSpread::new();

    let frames = duration_secs as usize * SAMPLE_RATE as usize;
    let mut samples = Vec::with_capacity(frames * 2);

    for i in 0..frames {
        let t = i as f32 / SAMPLE_RATE as f32;

        // Rain on glass: pink noise with droplet accents and slow swell
        let mut drops = rain.next(&mut rng) * 0.25;
        if rng.gen::<f32>() < 1e-4 {
            drops += rng.gen_range(-0.3..0.3);
        }
        drops *= 0.7 + 0.3 * (t * 0.02).sin();

        // Distant thunder rumbles
        let thunder_env = active_events(&thunder_times, t, 4.0, |tt| {
            (-tt * 0.8).exp() * (tt * 2.0).sin().abs()
        });
        let thunder =
            thunder_env * ((t * 25.0).sin() * 0.3 + rumble.next(&mut rng) * 0.3) * 0.4;

        // Air conditioning hum
        let room = (t * 60.0 * std::f32::consts::TAU).sin() * 0.02
            + (t * 120.0 * std::f32::consts::TAU).sin() * 0.01;

        spread.push(&mut samples, &mut rng, drops + thunder + room);
    }

    samples
}

fn render_forest_cafe(duration_secs: u32, seed: u64) -> Vec<f32> {
    let duration = duration_secs as f32;
    let mut schedule_rng = rng_for(seed, 1);
    let bird_times = schedule_events(&mut schedule_rng, duration, 1.0, 5.0, 2.0, 8.0);
    let chime_times = schedule_events(&mut schedule_rng, duration, 10.0, 20.0, 15.0, 40.0);

    let mut rng = rng_for(seed, 2);
    let mut breeze_noise = PinkNoise::new();
    let mut breeze_filter = OnePole::low_pass(400.0, SAMPLE_RATE);
    let mut chatter_noise = PinkNoise::new();
    let mut chatter_filter = OnePole::low_pass(300.0, SAMPLE_RATE);
    let mut stream = PinkNoise::new();
    let mut spread = StereoSpread::new();

    let frames = duration_secs as usize * SAMPLE_RATE as usize;
    let mut samples = Vec::with_capacity(frames * 2);

    for i in 0..frames {
        let t = i as f32 / SAMPLE_RATE as f32;

        let breeze =
            breeze_filter.next(breeze_noise.next(&mut rng)) * (0.5 + 0.5 * (t * 0.05).sin()) * 0.5;
        let chatter =
            chatter_filter.next(chatter_noise.next(&mut rng)) * (0.6 + 0.4 * (t * 0.11).sin()) * 0.3;
        let trickle = stream.next(&mut rng) * 0.08;

        // Birdsong: short upward chirps
        let birds = active_events(&bird_times, t, 0.25, |tt| {
            let env = (std::f32::consts::PI * tt / 0.25).sin().powi(2);
            let phase = 2_600.0 * tt + 1_600.0 * tt * tt;
            env * (phase * std::f32::consts::TAU).sin() * 0.12
        });

        // Wooden wind chimes: decaying partials
        let chimes = active_events(&chime_times, t, 2.0, |tt| {
            (-tt * 3.0).exp()
                * ((tt * 880.0 * std::f32::consts::TAU).sin() * 0.6
                    + (tt * 1_320.0 * std::f32::consts::TAU).sin() * 0.4)
                * 0.08
        });

        spread.push(&mut samples, &mut rng, breeze + chatter + trickle + birds + chimes);
    }

    samples
}

fn render_spaceship(duration_secs: u32, seed: u64) -> Vec<f32> {
    let duration = duration_secs as f32;
    let mut schedule_rng = rng_for(seed, 1);
    let beep_times = schedule_events(&mut schedule_rng, duration, 20.0, 40.0, 30.0, 60.0);

    let mut rng = rng_for(seed, 2);
    let mut engine_a = SineOsc::new(55.0, SAMPLE_RATE);
    let mut engine_b = SineOsc::new(55.7, SAMPLE_RATE);
    let mut engine_c = SineOsc::new(110.0, SAMPLE_RATE);
    let mut hiss_noise = PinkNoise::new();
    let mut hiss_filter = OnePole::low_pass(800.0, SAMPLE_RATE);
    let mut spread = StereoSpread::new();

    let frames = duration_secs as usize * SAMPLE_RATE as usize;
    let mut samples = Vec::with_capacity(frames * 2);

    for i in 0..frames {
        let t = i as f32 / SAMPLE_RATE as f32;

        // Engine resonance with a slow breathing swell
        let drone = ((engine_a.next() + engine_b.next()) * 0.12 + engine_c.next() * 0.05)
            * (0.8 + 0.2 * (t * 0.07).sin());

        // Life support hiss
        let hiss = hiss_filter.next(hiss_noise.next(&mut rng)) * 0.1;

        // Subtle electronic pulses
        let gate = ((t * 0.2 * std::f32::consts::TAU).sin() * 0.5 + 0.5).powi(4);
        let pulse = gate * (t * 196.0 * std::f32::consts::TAU).sin() * 0.03;

        // Control panel beeps
        let beeps = active_events(&beep_times, t, 0.12, |tt| {
            (std::f32::consts::PI * tt / 0.12).sin()
                * (tt * 880.0 * std::f32::consts::TAU).sin()
                * 0.05
        });

        spread.push(&mut samples, &mut rng, drone + hiss + pulse + beeps);
    }

    samples
}

fn render_ocean(duration_secs: u32, seed: u64) -> Vec<f32> {
    let duration = duration_secs as f32;
    let mut schedule_rng = rng_for(seed, 1);
    let gull_times = schedule_events(&mut schedule_rng, duration, 10.0, 25.0, 20.0, 50.0);

    let mut rng = rng_for(seed, 2);
    let mut surf_noise = PinkNoise::new();
    let mut surf_filter = OnePole::low_pass(600.0, SAMPLE_RATE);
    let mut wind_noise = PinkNoise::new();
    let mut wind_filter = OnePole::low_pass(200.0, SAMPLE_RATE);
    let mut backwash = PinkNoise::new();
    let mut spread = StereoSpread::new();

    let frames = duration_secs as usize * SAMPLE_RATE as usize;
    let mut samples = Vec::with_capacity(frames * 2);

    for i in 0..frames {
        let t = i as f32 / SAMPLE_RATE as f32;

        // Wave rhythm: slow squared swell over filtered noise
        let swell = 0.5 + 0.5 * (t * 0.08 * std::f32::consts::TAU).sin();
        let surf = surf_filter.next(surf_noise.next(&mut rng)) * swell * swell * 1.0;

        let wind = wind_filter.next(wind_noise.next(&mut rng)) * 0.24;
        let wash = backwash.next(&mut rng) * 0.08;

        // Seagulls in the distance
        let gulls = active_events(&gull_times, t, 0.6, |tt| {
            let warble = 1_100.0 + 300.0 * (tt * 30.0).sin();
            (-tt * 4.0).exp() * (tt * warble * std::f32::consts::TAU).sin() * 0.06
        });

        spread.push(&mut samples, &mut rng, surf + wind + wash + gulls);
    }

    samples
}

fn render_lofi(duration_secs: u32, seed: u64) -> Vec<f32> {
    const BPM: f32 = 72.0;
    let beat = 60.0 / BPM;
    let bar = 4.0 * beat;

    // Bass line and key dyads, two beats and one bar per step respectively
    let bass_notes = [55.0f32, 41.2, 49.0, 36.7];
    let key_chords = [(220.0f32, 277.2f32), (196.0, 246.9), (174.6, 220.0), (164.8, 207.7)];

    let mut rng = rng_for(seed, 2);
    let mut crackle = PinkNoise::new();
    let mut spread = StereoSpread::new();

    let frames = duration_secs as usize * SAMPLE_RATE as usize;
    let mut samples = Vec::with_capacity(frames * 2);

    for i in 0..frames {
        let t = i as f32 / SAMPLE_RATE as f32;
        let bar_t = t % bar;

        // Kick on the one and the off-beat before three (boom-bap)
        let mut drums = 0.0;
        for kick_at in [0.0, 2.5 * beat] {
            let tt = bar_t - kick_at;
            if (0.0..0.3).contains(&tt) {
                drums += (tt * 52.0 * std::f32::consts::TAU).sin() * (-tt * 20.0).exp() * 0.5;
            }
        }

        // Snare-ish noise hits on two and four
        for snare_at in [beat, 3.0 * beat] {
            let tt = bar_t - snare_at;
            if (0.0..0.2).contains(&tt) {
                drums += rng.gen_range(-1.0..1.0) * (-tt * 25.0).exp() * 0.12;
            }
        }

        // Closed hats on the eighths
        let hat_t = t % (0.5 * beat);
        drums += rng.gen_range(-1.0..1.0) * (-hat_t * 80.0).exp() * 0.06;

        // Muted bass, one note per half bar, with click-free edges
        let note_t = t % (2.0 * beat);
        let note = bass_notes[((t / (2.0 * beat)) as usize) % bass_notes.len()];
        let bass_env = (note_t * 20.0).min(1.0) * ((2.0 * beat - note_t) * 20.0).min(1.0);
        let bass = (t * note * std::f32::consts::TAU).sin() * bass_env * 0.12;

        // Soft key dyad, one chord per bar
        let chord = key_chords[((t / bar) as usize) % key_chords.len()];
        let chord_env = (bar_t * 8.0).min(1.0) * ((bar - bar_t) * 8.0).min(1.0);
        let keys = ((t * chord.0 * std::f32::consts::TAU).sin()
            + (t * chord.1 * std::f32::consts::TAU).sin())
            * chord_env
            * 0.04;

        // Vinyl crackle
        let mut vinyl = crackle.next(&mut rng) * 0.04;
        if rng.gen::<f32>() < 3e-4 {
            vinyl += rng.gen_range(-0.25..0.25);
        }

        spread.push(&mut samples, &mut rng, drums + bass + keys + vinyl);
    }

    samples
}

fn render_ambient(duration_secs: u32, seed: u64) -> Vec<f32> {
    let mut rng = rng_for(seed, 2);
    let mut pad = PinkNoise::new();
    let mut pad_filter = OnePole::low_pass(500.0, SAMPLE_RATE);
    let mut voice_a = SineOsc::new(220.0, SAMPLE_RATE);
    let mut voice_b = SineOsc::new(220.8, SAMPLE_RATE);
    let mut spread = StereoSpread::new();

    let frames = duration_secs as usize * SAMPLE_RATE as usize;
    let mut samples = Vec::with_capacity(frames * 2);

    for i in 0..frames {
        let t = i as f32 / SAMPLE_RATE as f32;

        let wash = pad_filter.next(pad.next(&mut rng)) * 0.3;
        let voices = (voice_a.next() + voice_b.next()) * 0.04 * (0.7 + 0.3 * (t * 0.05).sin());

        spread.push(&mut samples, &mut rng, wash + voices);
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str, duration_secs: u32, seed: u64) -> GenerationRequest {
        GenerationRequest::new(prompt.to_string(), duration_secs, ProviderKind::AudioGen, seed)
    }

    #[test]
    fn generates_requested_duration() {
        let provider = AudioGenProvider::new();
        let buffer = provider.generate(&request("gentle rain on the office window", 60, 1)).unwrap();
        assert_eq!(buffer.sample_rate, SAMPLE_RATE);
        assert_eq!(buffer.channels, CHANNELS);
        assert!((buffer.duration_secs() - 60.0).abs() < 0.01);
    }

    #[test]
    fn generation_is_deterministic_for_seed() {
        let provider = AudioGenProvider::new();
        let a = provider.generate(&request("ocean waves on a beach", 60, 42)).unwrap();
        let b = provider.generate(&request("ocean waves on a beach", 60, 42)).unwrap();
        assert_eq!(a.samples, b.samples);
    }

    #[test]
    fn seed_changes_output() {
        let provider = AudioGenProvider::new();
        let a = provider.generate(&request("ocean waves on a beach", 60, 1)).unwrap();
        let b = provider.generate(&request("ocean waves on a beach", 60, 2)).unwrap();
        assert_ne!(a.samples, b.samples);
    }

    #[test]
    fn output_is_not_silent_and_stays_in_range() {
        let provider = AudioGenProvider::new();
        for prompt in [
            "rain on the office window",
            "forest cafe with birdsong",
            "spacecraft drifting through deep space",
            "ocean waves at sunset",
            "late night coding lofi beats",
            "unclassifiable droning murmur",
        ] {
            let buffer = provider.generate(&request(prompt, 60, 3)).unwrap();
            assert!(buffer.peak() > 0.0, "silent output for {:?}", prompt);
            assert!(buffer.peak() <= 0.95, "clipped output for {:?}", prompt);
        }
    }

    #[test]
    fn probe_is_ready() {
        assert!(AudioGenProvider::new().probe().is_ready());
    }
}
