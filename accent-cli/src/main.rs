//! # pitch-accent - Japanese Pitch-Accent Checker
//!
//! Command-line front end for `accent-core`. It loads a recording, hands it to
//! the analyzer together with the target transcript and prints the verdict as a
//! report or as JSON for other tools.
//!
//! ## Commands
//! - `analyze`: classify the accent of a WAV recording
//! - `tokenize`: show how a transcript splits into morae
//! - `record`: capture a take from the microphone (`capture` feature)

#[cfg(feature = "capture")]
mod capture;
mod report;
mod wav;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use accent_core::{AnalysisConfig, PitchAccentAnalyzer, tokenize_morae};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Check the pitch accent of a spoken Japanese phrase
#[derive(Parser, Debug)]
#[command(name = "pitch-accent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify the pitch accent of a recording
    Analyze {
        /// Mono or multi-channel WAV recording of the phrase
        #[arg(short, long, value_name = "WAV")]
        input: PathBuf,

        /// Target transcript in kana
        #[arg(short, long)]
        text: String,

        /// Reference tones, one H or L per mora (e.g. LHH)
        #[arg(short, long, value_name = "PATTERN")]
        expected: Option<String>,

        /// JSON file with analysis parameters; the WAV's sample rate always wins
        #[arg(short, long, value_name = "FILE", env = "PITCH_ACCENT_CONFIG")]
        config: Option<PathBuf>,

        /// Print the full analysis as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Split a transcript into morae
    Tokenize {
        /// Transcript in kana
        text: String,
    },

    /// Record a take from the default microphone
    #[cfg(feature = "capture")]
    Record {
        /// Length of the take in seconds
        #[arg(short, long, default_value = "3.0")]
        seconds: f32,

        /// Destination WAV file
        #[arg(short, long, value_name = "WAV")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if cli.quiet { "error" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Analyze {
            input,
            text,
            expected,
            config,
            json,
        } => analyze(&input, &text, expected.as_deref(), config.as_deref(), json),
        Command::Tokenize { text } => {
            print!("{}", format_morae(&text));
            Ok(())
        }
        #[cfg(feature = "capture")]
        Command::Record { seconds, output } => {
            anyhow::ensure!(
                seconds > 0.0 && seconds <= 60.0,
                "--seconds must be between 0 and 60, got {seconds}"
            );
            let (samples, sample_rate) =
                capture::record(seconds, accent_core::config::DEFAULT_SAMPLE_RATE)?;
            wav::write_mono_f32(&output, &samples, sample_rate)?;
            println!(
                "Recorded {:.2} s at {} Hz to {}",
                samples.len() as f32 / sample_rate as f32,
                sample_rate,
                output.display()
            );
            Ok(())
        }
    }
}

fn analyze(
    input: &Path,
    text: &str,
    expected: Option<&str>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    let (samples, sample_rate) = wav::read_mono(input)?;
    config.sample_rate = sample_rate;

    let analyzer = PitchAccentAnalyzer::new(config)
        .with_context(|| format!("Cannot analyse '{}'", input.display()))?;
    debug!(config = ?analyzer.config(), "Analyzer ready");

    info!(
        samples = samples.len(),
        sample_rate,
        text,
        "Analysing recording"
    );
    let analysis = analyzer.analyze(&samples, text.trim(), expected.map(str::trim));

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", report::Report(&analysis));
    }
    Ok(())
}

/// Morae of `text` separated by spaces, followed by their count.
fn format_morae(text: &str) -> String {
    let morae = tokenize_morae(text.trim());
    format!("{}\n{} morae\n", morae.join(" "), morae.len())
}

/// Reads analysis parameters from a JSON file; absent fields keep their defaults.
fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config: AnalysisConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config file '{}'", path.display()))?;
    Ok(config)
}
