//! Error types for fmag.
//!
//! Defines all error codes and types used throughout the generator for
//! consistent error handling and reporting.

use std::fmt;

/// Error codes surfaced by the CLI on failure.
///
/// Every failure of a generation run maps to exactly one of these codes.
/// All errors are terminal for the current invocation; there is no
/// automatic retry across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Mood input matched no preset and is too short for a free-form prompt.
    /// Trigger: non-preset input under 10 characters.
    UnknownMood,

    /// Provider name matched no registered provider.
    /// Trigger: --provider value outside the registry.
    UnknownProvider,

    /// Selected provider failed its capability probe.
    /// Trigger: missing external dependency (API key, model weights).
    ProviderUnavailable,

    /// Generation exceeded the configured wall-clock budget.
    /// Trigger: provider still running when the timeout elapsed.
    GenerationTimeout,

    /// Provider returned audio outside the duration tolerance.
    /// Trigger: |actual - requested| > 2 seconds.
    DurationMismatch,

    /// Buffer is too short for the requested loop-crossfade window.
    /// Trigger: buffer length <= 2x the crossfade window.
    BufferTooShort,

    /// Requested duration is outside the valid range.
    /// Trigger: duration outside 60-300 seconds.
    InvalidDuration,

    /// Failed to write the output file.
    /// Trigger: permissions, missing directory, disk full.
    Write,

    /// Audio encoding failed.
    /// Trigger: encoder initialization or encode/flush failure.
    Codec,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownMood => "UNKNOWN_MOOD",
            ErrorCode::UnknownProvider => "UNKNOWN_PROVIDER",
            ErrorCode::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            ErrorCode::GenerationTimeout => "GENERATION_TIMEOUT",
            ErrorCode::DurationMismatch => "DURATION_MISMATCH",
            ErrorCode::BufferTooShort => "BUFFER_TOO_SHORT",
            ErrorCode::InvalidDuration => "INVALID_DURATION",
            ErrorCode::Write => "WRITE_ERROR",
            ErrorCode::Codec => "CODEC_ERROR",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnknownMood => "Mood is not a preset and is too short for a custom prompt",
            ErrorCode::UnknownProvider => "No provider is registered under that name",
            ErrorCode::ProviderUnavailable => "Provider is not available on this system",
            ErrorCode::GenerationTimeout => "Audio generation exceeded the wall-clock budget",
            ErrorCode::DurationMismatch => "Generated audio duration is outside tolerance",
            ErrorCode::BufferTooShort => "Audio is too short for the loop-crossfade window",
            ErrorCode::InvalidDuration => "Duration must be between 60 and 300 seconds",
            ErrorCode::Write => "Failed to write the output file",
            ErrorCode::Codec => "Audio encoding failed",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::UnknownMood => {
                "Run 'fmag moods' to list presets, or provide a longer descriptive \
                 prompt (at least 10 characters)"
            }
            ErrorCode::UnknownProvider => {
                "Run 'fmag providers' to list registered providers, or omit --provider \
                 to auto-detect one"
            }
            ErrorCode::ProviderUnavailable => {
                "Check the provider's configuration instructions, or pick another \
                 provider from 'fmag providers'"
            }
            ErrorCode::GenerationTimeout => {
                "Try a shorter duration, or raise the budget via FMAG_TIMEOUT_MS"
            }
            ErrorCode::DurationMismatch => {
                "Retry the generation; if the mismatch persists, try another provider"
            }
            ErrorCode::BufferTooShort => {
                "Request a longer duration, or disable loop optimization with --no-loop"
            }
            ErrorCode::InvalidDuration => {
                "Specify a duration between 1 and 5 minutes (e.g., --duration 2)"
            }
            ErrorCode::Write => {
                "Check that the output directory is writable and the disk is not full"
            }
            ErrorCode::Codec => {
                "Try the other output format (--format wav or --format mp3)"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for generation operations.
#[derive(Debug)]
pub struct FmagError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FmagError {
    /// Creates a new FmagError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new FmagError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an UNKNOWN_MOOD error.
    pub fn unknown_mood(input: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnknownMood,
            format!(
                "Unknown mood '{}'; use a preset or a longer custom prompt",
                input.into()
            ),
        )
    }

    /// Creates an UNKNOWN_PROVIDER error.
    pub fn unknown_provider(name: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnknownProvider,
            format!("Unknown provider '{}'", name.into()),
        )
    }

    /// Creates a PROVIDER_UNAVAILABLE error.
    pub fn provider_unavailable(name: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ProviderUnavailable,
            format!("Provider '{}' is not available: {}", name, reason.into()),
        )
    }

    /// Creates a GENERATION_TIMEOUT error.
    pub fn generation_timeout(provider: &str, budget_ms: u64) -> Self {
        Self::new(
            ErrorCode::GenerationTimeout,
            format!(
                "Provider '{}' did not finish within {} ms",
                provider, budget_ms
            ),
        )
    }

    /// Creates a DURATION_MISMATCH error.
    pub fn duration_mismatch(requested_secs: u32, actual_secs: f32) -> Self {
        Self::new(
            ErrorCode::DurationMismatch,
            format!(
                "Requested {} s of audio but provider returned {:.2} s",
                requested_secs, actual_secs
            ),
        )
    }

    /// Creates a BUFFER_TOO_SHORT error.
    pub fn buffer_too_short(buffer_ms: u64, window_ms: u32) -> Self {
        Self::new(
            ErrorCode::BufferTooShort,
            format!(
                "Buffer of {} ms cannot hold a {} ms loop-crossfade (needs more than {} ms)",
                buffer_ms,
                window_ms,
                2 * window_ms as u64
            ),
        )
    }

    /// Creates an INVALID_DURATION error.
    pub fn invalid_duration(duration_secs: u32) -> Self {
        Self::new(
            ErrorCode::InvalidDuration,
            format!(
                "Invalid duration: {} seconds (must be between 60 and 300)",
                duration_secs
            ),
        )
    }

    /// Creates a WRITE_ERROR from an I/O failure.
    pub fn write_failed(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::with_source(
            ErrorCode::Write,
            format!("Failed to write {}", path.display()),
            source,
        )
    }

    /// Creates a CODEC_ERROR.
    pub fn codec(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::Codec, format!("Encoding failed: {}", reason.into()))
    }
}

impl fmt::Display for FmagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for FmagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using FmagError.
pub type Result<T> = std::result::Result<T, FmagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_as_str() {
        assert_eq!(ErrorCode::UnknownMood.as_str(), "UNKNOWN_MOOD");
        assert_eq!(ErrorCode::UnknownProvider.as_str(), "UNKNOWN_PROVIDER");
        assert_eq!(ErrorCode::ProviderUnavailable.as_str(), "PROVIDER_UNAVAILABLE");
        assert_eq!(ErrorCode::GenerationTimeout.as_str(), "GENERATION_TIMEOUT");
        assert_eq!(ErrorCode::DurationMismatch.as_str(), "DURATION_MISMATCH");
        assert_eq!(ErrorCode::BufferTooShort.as_str(), "BUFFER_TOO_SHORT");
        assert_eq!(ErrorCode::InvalidDuration.as_str(), "INVALID_DURATION");
        assert_eq!(ErrorCode::Write.as_str(), "WRITE_ERROR");
        assert_eq!(ErrorCode::Codec.as_str(), "CODEC_ERROR");
    }

    #[test]
    fn error_code_recovery_hints_not_empty() {
        let codes = [
            ErrorCode::UnknownMood,
            ErrorCode::UnknownProvider,
            ErrorCode::ProviderUnavailable,
            ErrorCode::GenerationTimeout,
            ErrorCode::DurationMismatch,
            ErrorCode::BufferTooShort,
            ErrorCode::InvalidDuration,
            ErrorCode::Write,
            ErrorCode::Codec,
        ];
        for code in codes {
            assert!(!code.recovery_hint().is_empty());
            assert!(!code.description().is_empty());
        }
    }

    #[test]
    fn fmag_error_display() {
        let err = FmagError::invalid_duration(500);
        assert!(err.to_string().contains("INVALID_DURATION"));
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Recovery:"));
    }

    #[test]
    fn duration_mismatch_reports_both_values() {
        let err = FmagError::duration_mismatch(120, 95.5);
        assert_eq!(err.code, ErrorCode::DurationMismatch);
        assert!(err.message.contains("120"));
        assert!(err.message.contains("95.5"));
    }

    #[test]
    fn write_error_keeps_source() {
        use std::error::Error;
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = FmagError::write_failed(std::path::Path::new("/tmp/x.mp3"), io);
        assert_eq!(err.code, ErrorCode::Write);
        assert!(err.source().is_some());
    }
}
