//! WAV encoding for audio output.
//!
//! Writes audio buffers to WAV format using the hound crate.

use std::io::{Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::audio::AudioBuffer;
use crate::error::{FmagError, Result};

/// Writes an audio buffer to a WAV file.
///
/// # Example
///
/// ```ignore
/// use fmag::audio::{write_wav, AudioBuffer};
///
/// let buffer = AudioBuffer::new(vec![0.0, 0.5, -0.5, 0.0], 44_100, 1);
/// write_wav(&buffer, "/tmp/test.wav".as_ref())?;
/// ```
pub fn write_wav(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| FmagError::write_failed(path, e))?;
    write_wav_to(std::io::BufWriter::new(file), buffer)
}

/// Writes an audio buffer as WAV to an arbitrary writer.
pub fn write_wav_to<W: Write + Seek>(writer: W, buffer: &AudioBuffer) -> Result<()> {
    let spec = WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut wav = WavWriter::new(writer, spec)
        .map_err(|e| FmagError::codec(format!("failed to create WAV writer: {}", e)))?;

    for sample in &buffer.samples {
        wav.write_sample(*sample)
            .map_err(|e| FmagError::codec(format!("failed to write WAV sample: {}", e)))?;
    }

    wav.finalize()
        .map_err(|e| FmagError::codec(format!("failed to finalize WAV file: {}", e)))?;

    Ok(())
}
