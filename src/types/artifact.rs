//! Output artifact type and audio format selection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MP3 at 192 kbps via libmp3lame.
    #[default]
    Mp3,

    /// 32-bit float WAV.
    Wav,
}

impl AudioFormat {
    /// Returns the string representation of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    /// Parses a format from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" | "wave" => Some(AudioFormat::Wav),
            _ => None,
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A successfully written output file.
///
/// Created once per run after the full pipeline has succeeded; the process
/// holds no further reference to the audio once this exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputArtifact {
    /// Full filesystem path of the written file.
    pub path: PathBuf,

    /// Encoding of the written file.
    pub format: AudioFormat,

    /// Duration of the written audio in seconds.
    pub duration_secs: f32,

    /// Deterministic id derived from the generation parameters.
    pub artifact_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!(AudioFormat::parse("mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::parse("MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::parse("wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::parse("wave"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::parse("ogg"), None);
    }

    #[test]
    fn format_display_and_extension() {
        assert_eq!(AudioFormat::Mp3.to_string(), "mp3");
        assert_eq!(AudioFormat::Wav.extension(), "wav");
    }

    #[test]
    fn format_default_is_mp3() {
        assert_eq!(AudioFormat::default(), AudioFormat::Mp3);
    }
}
