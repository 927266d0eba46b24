//! fraction-drill CLI: play drills in the terminal, build progress reports,
//! and preview generated questions.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fraction-drill", version, about = "Fraction and multiplication practice drills")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a practice session in the terminal
    Play {
        /// Seed for a reproducible question sequence
        #[arg(long)]
        seed: Option<u64>,

        /// Progress log to append attempts to
        #[arg(long, default_value = "progress.log")]
        log_file: PathBuf,

        /// TOML file overriding the difficulty tiers
        #[arg(long)]
        config: Option<PathBuf>,

        /// Stop after this many answered questions
        #[arg(long)]
        rounds: Option<usize>,

        /// Restrict the session to these exercise type ids (repeatable)
        #[arg(long = "exercise")]
        exercises: Vec<String>,
    },

    /// Generate an HTML and JSON report from a progress log
    Report {
        /// Progress log to read
        #[arg(long, default_value = "progress.log")]
        log_file: PathBuf,

        /// Directory for report.html and summary.json
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,
    },

    /// Print one generated question without playing it
    Sample {
        /// Exercise type id, e.g. "number_line" or "multiplication_hard"
        #[arg(long)]
        exercise: String,

        /// Seed for a reproducible question
        #[arg(long)]
        seed: Option<u64>,

        /// Print the question as JSON
        #[arg(long)]
        json: bool,

        /// TOML file overriding the difficulty tiers
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List exercise type ids
    List,
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("fraction_drill=warn".parse()?),
        )
        .init();
    Ok(())
}

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play { seed, log_file, config, rounds, exercises } => {
            commands::play::execute(seed, log_file, config, rounds, exercises)
        }
        Commands::Report { log_file, output_dir } => commands::report::execute(log_file, output_dir),
        Commands::Sample { exercise, seed, json, config } => commands::sample::execute(exercise, seed, json, config),
        Commands::List => commands::list(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
