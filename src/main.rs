//! fmag: Focus Mode Ambience Generator.
//!
//! Command-line entry point. Dispatches to the subcommand handlers, or to
//! the interactive guided flow when no subcommand is given.

use std::io::{self, Write as _};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use fmag::cli::{Cli, Command, GenerateArgs};
use fmag::error::Result;
use fmag::generation::AmbienceGenerator;
use fmag::moods::{self, ResolvedMood};
use fmag::providers::{self, ProviderKind};

fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "✗".red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Generate(args)) => {
            print_banner();
            execute_generate(&args)
        }
        Some(Command::Moods { json }) => cmd_moods(json),
        Some(Command::Providers { json }) => cmd_providers(json),
        None => cmd_interactive(),
    }
}

/// Initializes diagnostic logging on stderr.
///
/// `--debug` raises the default filter to debug; FMAG_LOG overrides both.
fn init_tracing(debug: bool) {
    let default_filter = if debug { "fmag=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("FMAG_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

fn print_banner() {
    println!("{}", "fmag".cyan().bold());
    println!(
        "{}",
        format!(
            "Focus Mode Ambience Generator v{}",
            env!("CARGO_PKG_VERSION")
        )
        .dimmed()
    );
    println!();
}

/// Runs the `generate` subcommand (also the tail of the interactive flow).
fn execute_generate(args: &GenerateArgs) -> Result<()> {
    let config = args.to_config()?;

    match moods::resolve(&config.mood) {
        ResolvedMood::Preset(preset) => {
            println!("{} {}", "Mood:".dimmed(), preset.name.bold());
            println!("      {}", preset.description.dimmed());
        }
        ResolvedMood::Custom(text) => {
            println!("{} {}", "Mood:".dimmed(), "custom prompt".bold());
            println!("      {}", text.dimmed());
        }
    }
    println!(
        "{} {} minutes",
        "Duration:".dimmed(),
        args.duration
            .map(|minutes| minutes.to_string())
            .unwrap_or_else(|| "preset default".to_string())
    );
    println!(
        "{} {}",
        "Provider:".dimmed(),
        config
            .provider
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "auto-detect".to_string())
    );
    println!(
        "{} {}",
        "Output:".dimmed(),
        config.effective_output_dir().display()
    );
    println!();

    let generator = AmbienceGenerator::new(config);

    let mut errors = generator.validate();
    if !errors.is_empty() {
        for error in errors.iter().skip(1) {
            eprintln!("{} {}", "✗".red(), error);
        }
        return Err(errors.remove(0));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("static spinner template"),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = generator.run_with_progress(|phase| spinner.set_message(phase.label()));
    spinner.finish_and_clear();
    let artifact = result?;

    println!("{}", "Audio generated successfully!".green().bold());
    println!(
        "  {} {}",
        "Saved to:".dimmed(),
        artifact.path.display().to_string().cyan()
    );
    println!(
        "  {} {:.1}s ({})",
        "Duration:".dimmed(),
        artifact.duration_secs,
        artifact.format
    );
    println!();
    println!("{}", "Play on loop with:".dimmed());
    println!(
        "  {}",
        format!("mpv --loop {}", artifact.path.display()).yellow()
    );

    Ok(())
}

/// Runs the `moods` subcommand.
fn cmd_moods(json: bool) -> Result<()> {
    if json {
        let rows: Vec<moods::MoodListing> =
            moods::list_presets().iter().map(Into::into).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).expect("mood listing serializes")
        );
        return Ok(());
    }

    print_banner();
    println!("{}", "Available mood presets".bold());
    println!();
    for preset in moods::list_presets() {
        println!(
            "  {}  {}",
            preset.name.bold(),
            format!("[{}]", preset.intensity).dimmed()
        );
        println!("     {}", preset.description.dimmed());
    }
    println!();
    println!(
        "{} {}",
        "Use with:".dimmed(),
        "fmag generate <mood>".cyan()
    );
    Ok(())
}

/// Runs the `providers` subcommand.
fn cmd_providers(json: bool) -> Result<()> {
    let rows = providers::list_providers();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).expect("provider listing serializes")
        );
        return Ok(());
    }

    print_banner();
    println!("{}", "Audio providers".bold());
    println!();
    for row in &rows {
        let status = if row.available {
            "✓ Available".green()
        } else {
            "⚠ Setup needed".yellow()
        };
        println!("  {}  {}", row.name.bold(), status);
        println!("     {}", row.description.dimmed());
    }
    println!();
    println!(
        "{} {}",
        "Use with:".dimmed(),
        "fmag generate <mood> --provider <name>".cyan()
    );
    Ok(())
}

/// Guided flow used when fmag is invoked without a subcommand.
fn cmd_interactive() -> Result<()> {
    print_banner();
    println!(
        "{}",
        "Let's create the perfect ambient soundscape for your focus session.".bold()
    );
    println!();

    // Step 1: mood
    println!("{}", "Step 1: Select a mood".cyan().bold());
    let presets = moods::list_presets();
    for (i, preset) in presets.iter().enumerate() {
        println!("  {}. {}", i + 1, preset.name.bold());
        println!("     {}", preset.description.dimmed());
    }
    println!("  {}. Custom prompt", presets.len() + 1);
    let choice = prompt_choice("Select mood", presets.len() + 1, 1);
    let mood = if choice == presets.len() + 1 {
        prompt_line("Enter custom prompt")
    } else {
        presets[choice - 1].name.to_string()
    };
    println!();

    // Step 2: duration
    println!("{}", "Step 2: Select duration".cyan().bold());
    let durations = [1u32, 2, 3, 5];
    let labels = [
        "1 minute  (quick test)",
        "2 minutes (default)",
        "3 minutes (medium session)",
        "5 minutes (extended focus)",
    ];
    for (i, label) in labels.iter().enumerate() {
        println!("  {}. {}", i + 1, label);
    }
    let choice = prompt_choice("Select duration", durations.len(), 2);
    let duration = durations[choice - 1];
    println!();

    // Step 3: provider
    println!("{}", "Step 3: Select provider".cyan().bold());
    println!("  1. Auto-detect (recommended)");
    let kinds = ProviderKind::all();
    for (i, kind) in kinds.iter().enumerate() {
        println!("  {}. {}", i + 2, kind);
    }
    let choice = prompt_choice("Select provider", kinds.len() + 1, 1);
    let provider = if choice == 1 {
        None
    } else {
        Some(kinds[choice - 2].as_str().to_string())
    };
    println!();

    println!("{} Configuration complete!", "✓".green());
    println!();

    let args = GenerateArgs {
        mood,
        duration: Some(duration),
        provider,
        output: None,
        format: None,
        seed: None,
        no_fade: false,
        no_loop: false,
    };
    execute_generate(&args)
}

/// Reads a numbered menu choice from stdin.
///
/// Empty input and read failures (EOF) fall back to the default.
fn prompt_choice(label: &str, max: usize, default: usize) -> usize {
    loop {
        print!("{} [{}]: ", label, default);
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return default;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return default;
        }

        match trimmed.parse::<usize>() {
            Ok(n) if (1..=max).contains(&n) => return n,
            _ => println!(
                "{}",
                format!("Enter a number between 1 and {}", max).yellow()
            ),
        }
    }
}

/// Reads one line of free text from stdin.
fn prompt_line(label: &str) -> String {
    print!("{}: ", label);
    let _ = io::stdout().flush();

    let mut line = String::new();
    let _ = io::stdin().read_line(&mut line);
    line.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_doesnt_panic() {
        print_banner();
    }

    #[test]
    fn listing_commands_succeed() {
        assert!(cmd_moods(true).is_ok());
        assert!(cmd_moods(false).is_ok());
        assert!(cmd_providers(true).is_ok());
        assert!(cmd_providers(false).is_ok());
    }
}
