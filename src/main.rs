//! Sealed Wordle - CLI
//!
//! Daily word game whose match state lives on a simulated encrypted ledger.
//! TUI and line-based front-ends share one reconciliation controller.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sealed_wordle::{
    commands::{check_guess, run_simple, run_status},
    config::{Epoch, GameConfig},
    controller::{Readiness, ReconciliationController},
    gateway::InMemoryGateway,
    interactive::{App, run_tui},
    output::print_check_result,
    wordlists::WordList,
};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::LocalSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sealed_wordle",
    about = "Word-guessing game played against an encrypted remote ledger",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Game date (YYYY-MM-DD); defaults to today
    #[arg(short, long, global = true)]
    date: Option<NaiveDate>,

    /// Simulated latency of every ledger call, in milliseconds
    #[arg(long, global = true, default_value = "400")]
    latency_ms: u64,

    /// Simulated time for the encrypted computation to come up, in milliseconds
    #[arg(long, global = true, default_value = "800")]
    ready_delay_ms: u64,

    /// Revealed hints must be used in later guesses
    #[arg(long, global = true)]
    hard_mode: bool,

    /// Extra accepted guesses, one per line
    #[arg(short = 'w', long, global = true)]
    wordlist: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Write logs to this file (the TUI discards logs otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Interactive TUI mode (default)
    Play,

    /// Simple line-based mode (no TUI)
    Simple,

    /// Print the match state of a fresh simulated ledger and exit
    ///
    /// Each run starts its own in-process ledger, so the report shows the
    /// epoch's opening state: date, attempts and whether the match is open.
    Status,

    /// Classify a guess against a solution offline
    Check {
        /// The guessed word
        guess: String,

        /// The solution to compare against
        solution: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Play);
    init_logging(&cli, matches!(command, Commands::Play))?;

    // Remote work is spawned with spawn_local, so every front-end runs on a LocalSet
    let local = LocalSet::new();

    match command {
        Commands::Play => {
            let (controller, epoch) = build_session(&cli)?;
            local.run_until(run_tui(App::new(controller, epoch.index()))).await
        }
        Commands::Simple => {
            let (mut controller, epoch) = build_session(&cli)?;
            local.run_until(run_simple(&mut controller, epoch.index())).await
        }
        Commands::Status => {
            let (mut controller, epoch) = build_session(&cli)?;
            local.run_until(run_status(&mut controller, epoch.index())).await
        }
        Commands::Check { guess, solution } => {
            let result = check_guess(&guess, &solution)?;
            print_check_result(&result.guess, &result.solution, &result.feedback);
            Ok(())
        }
    }
}

/// Route `tracing` output
///
/// The TUI owns the terminal, so its logs go to `--log-file` or nowhere.
fn init_logging(cli: &Cli, tui: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match (&cli.log_file, tui) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        (None, true) => builder.with_writer(std::io::sink).try_init(),
        (None, false) => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!(e))
}

/// Resolve the epoch and its solution, then wire the simulated ledger
///
/// One `Readiness` handle is created here for the whole process.
fn build_session(cli: &Cli) -> Result<(ReconciliationController<InMemoryGateway>, Epoch)> {
    let config = GameConfig {
        hard_mode: cli.hard_mode,
        ..GameConfig::default()
    };
    config.validate()?;

    let mut words = WordList::embedded(config.word_length);
    if let Some(path) = &cli.wordlist {
        let added = words.extend_from_file(path)?;
        info!(added, path = %path.display(), "loaded extra words");
    }

    let epoch = match cli.date {
        Some(date) => Epoch::from_date(date)?,
        None => Epoch::today()?,
    };
    let solution = epoch.solution(words.answers())?;
    info!(epoch = epoch.index(), date = %epoch.date(), "game selected");

    let gateway = InMemoryGateway::new(solution.clone(), words.clone(), config.max_attempts)
        .with_ready_delay(Duration::from_millis(cli.ready_delay_ms))
        .with_latency(Duration::from_millis(cli.latency_ms));
    let controller =
        ReconciliationController::new(gateway, Readiness::new(), solution, words, config);

    Ok((controller, epoch))
}
