//! MP3 encoding via libmp3lame.
//!
//! LAME is fed interleaved stereo PCM; mono buffers are upmixed before
//! encoding so both providers can target MP3 output.

use std::io::Write;
use std::path::Path;

use mp3lame_encoder::{Builder, FlushNoGap, InterleavedPcm, Quality};

use crate::audio::AudioBuffer;
use crate::error::{FmagError, Result};

/// Write an audio buffer to a file as MP3 at 192 kbps.
pub fn write_mp3(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| FmagError::write_failed(path, e))?;
    write_mp3_to(file, buffer)
}

/// Write an audio buffer to a writer as MP3 at 192 kbps.
pub fn write_mp3_to<W: Write>(mut writer: W, buffer: &AudioBuffer) -> Result<()> {
    let stereo;
    let buffer = if buffer.channels == 2 {
        buffer
    } else {
        stereo = buffer.to_stereo();
        &stereo
    };

    let mut encoder = Builder::new()
        .ok_or_else(|| FmagError::codec("failed to create LAME encoder"))?
        .with_num_channels(2)
        .map_err(|e| FmagError::codec(format!("LAME set_num_channels failed: {:?}", e)))?
        .with_sample_rate(buffer.sample_rate)
        .map_err(|e| FmagError::codec(format!("LAME set_sample_rate failed: {:?}", e)))?
        .with_brate(mp3lame_encoder::Bitrate::Kbps192)
        .map_err(|e| FmagError::codec(format!("LAME set_brate failed: {:?}", e)))?
        .with_quality(Quality::Best)
        .map_err(|e| FmagError::codec(format!("LAME set_quality failed: {:?}", e)))?
        .build()
        .map_err(|e| FmagError::codec(format!("LAME build failed: {:?}", e)))?;

    let mut out = Vec::new();
    out.reserve(mp3lame_encoder::max_required_buffer_size(buffer.frames()));

    let encoded_size = encoder
        .encode(InterleavedPcm(&buffer.samples), out.spare_capacity_mut())
        .map_err(|e| FmagError::codec(format!("LAME encode failed: {:?}", e)))?;
    // SAFETY: encode filled exactly `encoded_size` bytes into spare capacity.
    unsafe { out.set_len(encoded_size) };

    let flush_size = encoder
        .flush::<FlushNoGap>(out.spare_capacity_mut())
        .map_err(|e| FmagError::codec(format!("LAME flush failed: {:?}", e)))?;
    // SAFETY: flush filled exactly `flush_size` bytes into spare capacity.
    unsafe { out.set_len(out.len() + flush_size) };

    writer
        .write_all(&out)
        .map_err(|e| FmagError::codec(format!("failed to write MP3 data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_encode_produces_mp3_frames() {
        // 1 second of silence at 44.1kHz stereo
        let buffer = AudioBuffer::silence(1.0, 44_100, 2);
        let mut out = std::io::Cursor::new(Vec::new());
        write_mp3_to(&mut out, &buffer).unwrap();

        let bytes = out.into_inner();
        assert!(!bytes.is_empty());
        // Expect an MP3 sync frame or ID3 header at the start
        assert!(
            bytes[0] == 0xFF || bytes[0] == 0x49,
            "expected MP3 sync or ID3 header, got 0x{:02X}",
            bytes[0]
        );
    }

    #[test]
    fn mono_buffers_are_upmixed() {
        let buffer = AudioBuffer::silence(0.5, 24_000, 1);
        let mut out = std::io::Cursor::new(Vec::new());
        write_mp3_to(&mut out, &buffer).unwrap();
        assert!(!out.into_inner().is_empty());
    }
}
