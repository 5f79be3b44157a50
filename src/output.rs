//! Output writer.
//!
//! Encodes a processed buffer to disk under a deterministic name:
//! `fmag-{slug}-{artifact_id}.{ext}`. Encoding goes to a `.part` staging
//! file that is renamed into place only after the encoder finishes, so a
//! failure never leaves a partial artifact behind. An existing file of the
//! same name is never overwritten; collisions get a fresh numeric suffix.

use std::fs;
use std::path::PathBuf;

use crate::audio::{mp3, wav, AudioBuffer};
use crate::error::{FmagError, Result};
use crate::types::{AudioFormat, OutputArtifact};

/// Filename prefix for all generated artifacts.
const FILE_PREFIX: &str = "fmag";

/// Writes processed buffers into a destination directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    format: AudioFormat,
}

impl OutputWriter {
    /// Creates a writer targeting the given directory and format.
    pub fn new(dir: PathBuf, format: AudioFormat) -> Self {
        Self { dir, format }
    }

    /// Encodes and writes the buffer, returning the artifact.
    ///
    /// Creates the destination directory if absent.
    pub fn write(
        &self,
        buffer: &AudioBuffer,
        slug: &str,
        artifact_id: &str,
    ) -> Result<OutputArtifact> {
        fs::create_dir_all(&self.dir).map_err(|e| FmagError::write_failed(&self.dir, e))?;

        let path = self.unique_path(slug, artifact_id);
        let staging = path.with_extension(format!("{}.part", self.format.extension()));

        let encoded = match self.format {
            AudioFormat::Wav => wav::write_wav(buffer, &staging),
            AudioFormat::Mp3 => mp3::write_mp3(buffer, &staging),
        };
        if let Err(err) = encoded {
            let _ = fs::remove_file(&staging);
            return Err(err);
        }

        if let Err(err) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(FmagError::write_failed(&path, err));
        }

        tracing::debug!(path = %path.display(), "artifact written");

        Ok(OutputArtifact {
            path,
            format: self.format,
            duration_secs: buffer.duration_secs(),
            artifact_id: artifact_id.to_string(),
        })
    }

    /// Returns the first free path for the deterministic name.
    fn unique_path(&self, slug: &str, artifact_id: &str) -> PathBuf {
        let ext = self.format.extension();
        let base = format!("{}-{}-{}", FILE_PREFIX, slug, artifact_id);

        let candidate = self.dir.join(format!("{}.{}", base, ext));
        if !candidate.exists() {
            return candidate;
        }

        let mut counter = 1;
        loop {
            let candidate = self.dir.join(format!("{}-{}.{}", base, counter, ext));
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_buffer() -> AudioBuffer {
        AudioBuffer::new(vec![0.0, 0.5, -0.5, 0.0], 44_100, 1)
    }

    #[test]
    fn writes_artifact_with_deterministic_name() {
        let dir = tempdir().unwrap();
        let writer = OutputWriter::new(dir.path().to_path_buf(), AudioFormat::Wav);

        let artifact = writer.write(&test_buffer(), "forest_cafe", "abcd1234abcd1234").unwrap();

        assert!(artifact.path.exists());
        assert_eq!(
            artifact.path.file_name().unwrap().to_str().unwrap(),
            "fmag-forest_cafe-abcd1234abcd1234.wav"
        );
        assert_eq!(artifact.format, AudioFormat::Wav);
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        let writer = OutputWriter::new(nested.clone(), AudioFormat::Wav);

        let artifact = writer.write(&test_buffer(), "custom", "0000000000000000").unwrap();
        assert!(artifact.path.starts_with(&nested));
        assert!(artifact.path.exists());
    }

    #[test]
    fn collisions_get_fresh_suffixes() {
        let dir = tempdir().unwrap();
        let writer = OutputWriter::new(dir.path().to_path_buf(), AudioFormat::Wav);

        let first = writer.write(&test_buffer(), "custom", "1111111111111111").unwrap();
        let second = writer.write(&test_buffer(), "custom", "1111111111111111").unwrap();
        let third = writer.write(&test_buffer(), "custom", "1111111111111111").unwrap();

        assert!(first.path.exists());
        assert!(second.path.exists());
        assert!(third.path.exists());
        assert_ne!(first.path, second.path);
        assert!(second.path.to_str().unwrap().ends_with("-1.wav"));
        assert!(third.path.to_str().unwrap().ends_with("-2.wav"));
    }

    #[test]
    fn no_staging_file_left_behind() {
        let dir = tempdir().unwrap();
        let writer = OutputWriter::new(dir.path().to_path_buf(), AudioFormat::Wav);
        writer.write(&test_buffer(), "custom", "2222222222222222").unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().to_str().unwrap().contains(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn unwritable_destination_is_a_write_error() {
        let dir = tempdir().unwrap();
        // A file where the output directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, b"x").unwrap();

        let writer = OutputWriter::new(blocker.join("out"), AudioFormat::Wav);
        let err = writer.write(&test_buffer(), "custom", "3333333333333333").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Write);
    }
}
