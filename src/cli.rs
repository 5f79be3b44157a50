//! CLI argument parser.
//!
//! Defines the command surface: `generate`, `moods`, `providers`, plus an
//! interactive guided flow when no subcommand is given.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::GenerationConfig;
use crate::error::{FmagError, Result};
use crate::providers::ProviderKind;
use crate::types::AudioFormat;

/// Output format choice on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// MP3 at 192 kbps
    #[default]
    Mp3,
    /// 32-bit float WAV
    Wav,
}

impl From<FormatArg> for AudioFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Mp3 => AudioFormat::Mp3,
            FormatArg::Wav => AudioFormat::Wav,
        }
    }
}

/// fmag: Focus Mode Ambience Generator
#[derive(Parser, Debug)]
#[command(name = "fmag")]
#[command(about = "Focus Mode Ambience Generator - AI-powered ambient soundscapes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate ambient audio from a mood preset or custom prompt
    Generate(GenerateArgs),

    /// List all available mood presets
    Moods {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// List audio providers and their availability
    Providers {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Mood preset name (e.g., calm_rain_office) or custom prompt
    pub mood: String,

    /// Duration in minutes (1-5); defaults to the preset's duration
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=5))]
    pub duration: Option<u32>,

    /// Audio provider (audiogen, bark); auto-detected when omitted
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Output directory for generated files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (default: mp3)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Random seed for reproducible generation
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Disable fade in/out effects
    #[arg(long)]
    pub no_fade: bool,

    /// Disable loop optimization
    #[arg(long)]
    pub no_loop: bool,
}

impl GenerateArgs {
    /// Builds the generation configuration from the arguments.
    ///
    /// Environment variables are read first, then explicit flags are applied
    /// on top, so the command line always wins.
    ///
    /// Fails with UnknownProvider if --provider names no registered backend.
    pub fn to_config(&self) -> Result<GenerationConfig> {
        let provider = match &self.provider {
            Some(name) => {
                Some(ProviderKind::parse(name).ok_or_else(|| FmagError::unknown_provider(name))?)
            }
            None => None,
        };

        let mut config = GenerationConfig::new(&self.mood).apply_env();
        config.duration_min = self.duration;
        config.seed = self.seed;
        if provider.is_some() {
            config.provider = provider;
        }
        if self.output.is_some() {
            config.output_dir = self.output.clone();
        }
        if let Some(format) = self.format {
            config.format = format.into();
        }

        if self.no_fade {
            config.pipeline.fade_in_ms = 0;
            config.pipeline.fade_out_ms = 0;
        }
        config.pipeline.loop_optimize = !self.no_loop;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn generate_with_defaults() {
        let cli = parse(&["fmag", "generate", "forest_cafe"]);
        match cli.command {
            Some(Command::Generate(args)) => {
                assert_eq!(args.mood, "forest_cafe");
                assert!(args.duration.is_none());
                assert!(args.provider.is_none());
                assert!(args.format.is_none());
                assert!(!args.no_fade);
                assert!(!args.no_loop);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn duration_range_is_enforced() {
        assert!(Cli::try_parse_from(["fmag", "generate", "forest_cafe", "-d", "10"]).is_err());
        assert!(Cli::try_parse_from(["fmag", "generate", "forest_cafe", "-d", "0"]).is_err());
        assert!(Cli::try_parse_from(["fmag", "generate", "forest_cafe", "-d", "5"]).is_ok());
    }

    #[test]
    fn no_subcommand_is_interactive() {
        let cli = parse(&["fmag"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn debug_flag_is_global() {
        let cli = parse(&["fmag", "generate", "forest_cafe", "--debug"]);
        assert!(cli.debug);
    }

    #[test]
    fn unknown_provider_fails_config() {
        let cli = parse(&["fmag", "generate", "forest_cafe", "-p", "nonexistent"]);
        match cli.command {
            Some(Command::Generate(args)) => {
                let err = args.to_config().unwrap_err();
                assert_eq!(err.code, ErrorCode::UnknownProvider);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn no_fade_zeroes_both_ramps() {
        let cli = parse(&["fmag", "generate", "forest_cafe", "--no-fade", "--no-loop"]);
        match cli.command {
            Some(Command::Generate(args)) => {
                let config = args.to_config().unwrap();
                assert_eq!(config.pipeline.fade_in_ms, 0);
                assert_eq!(config.pipeline.fade_out_ms, 0);
                assert!(!config.pipeline.loop_optimize);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn free_form_prompt_is_one_argument() {
        let cli = parse(&["fmag", "generate", "peaceful zen garden with wind chimes", "-d", "5"]);
        match cli.command {
            Some(Command::Generate(args)) => {
                assert_eq!(args.mood, "peaceful zen garden with wind chimes");
                assert_eq!(args.duration, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
