//! Sample-rate conversion using rubato.
//!
//! Providers synthesize at their native rate; the pipeline brings every
//! buffer to the configured output rate before further processing.

use rubato::{FastFixedIn, PolynomialDegree, Resampler};

use crate::audio::AudioBuffer;
use crate::error::{FmagError, Result};

/// Chunk size fed to the resampler per iteration.
const CHUNK_FRAMES: usize = 1024;

/// Resamples a buffer to the target sample rate.
///
/// Returns the input unchanged when the rates already match. The output is
/// trimmed to the frame count implied by the rate ratio, so duration is
/// preserved within one chunk of rounding.
pub fn resample(buffer: AudioBuffer, target_rate: u32) -> Result<AudioBuffer> {
    if buffer.sample_rate == target_rate {
        return Ok(buffer);
    }

    let channels = buffer.channels as usize;
    let ratio = target_rate as f64 / buffer.sample_rate as f64;

    let mut resampler = FastFixedIn::<f32>::new(
        ratio,
        1.0, // fixed ratio, no variance
        PolynomialDegree::Cubic,
        CHUNK_FRAMES,
        channels,
    )
    .map_err(|e| FmagError::codec(format!("failed to create resampler: {}", e)))?;

    // Deinterleave into per-channel planes
    let in_frames = buffer.frames();
    let mut planes: Vec<Vec<f32>> = vec![Vec::with_capacity(in_frames); channels];
    for frame in buffer.samples.chunks_exact(channels) {
        for (plane, &sample) in planes.iter_mut().zip(frame) {
            plane.push(sample);
        }
    }

    let chunk = resampler.input_frames_next();
    let mut input = vec![vec![0.0f32; chunk]; channels];
    let mut output: Vec<Vec<f32>> = vec![Vec::new(); channels];

    let mut pos = 0;
    while pos < in_frames {
        let end = (pos + chunk).min(in_frames);
        let len = end - pos;

        for (buf, plane) in input.iter_mut().zip(&planes) {
            buf[..len].copy_from_slice(&plane[pos..end]);
            if len < chunk {
                buf[len..].fill(0.0);
            }
        }

        let processed = resampler
            .process(&input, None)
            .map_err(|e| FmagError::codec(format!("resampling failed: {}", e)))?;

        for (out, chunk_out) in output.iter_mut().zip(&processed) {
            out.extend_from_slice(chunk_out);
        }

        pos = end;
    }

    // Trim to the expected frame count and reinterleave
    let out_frames = ((in_frames as f64) * ratio).round() as usize;
    let out_frames = out_frames.min(output[0].len());

    let mut samples = Vec::with_capacity(out_frames * channels);
    for i in 0..out_frames {
        for plane in &output {
            samples.push(plane[i]);
        }
    }

    Ok(AudioBuffer::new(samples, target_rate, buffer.channels))
}
