//! Development tasks for the Ludus workspace
//!
//! Headless tooling over the balance harness and the save format.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use commands::{MatchupCmd, Progression, Simulate, ValidateSave};
use console::style;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Development tasks for Ludus
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Balance simulation and save tooling for Ludus", long_about = None)]
#[command(version)]
struct Cli {
    /// Also write logs to `xtask.log` in the log directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run every class against every bug type and print a balance report
    Simulate(Simulate),

    /// Run a single matchup and print its summary
    Matchup(MatchupCmd),

    /// Sweep one class against one bug type over levels and severities
    Progression(Progression),

    /// Load and validate a save file
    ValidateSave(ValidateSave),
}

fn main() -> ExitCode {
    // Load .env file if it exists (for SIM_* and LUDUS_* overrides)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = match setup_logging(cli.log_file) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("{} {err:#}", style("✗").red().bold());
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Simulate(cmd) => cmd.execute(),
        Command::Matchup(cmd) => cmd.execute(),
        Command::Progression(cmd) => cmd.execute(),
        Command::ValidateSave(cmd) => cmd.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("✗").red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default `info`). With
/// `log_file`, also to `xtask.log` under the runtime log directory.
fn setup_logging(log_file: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = if log_file {
        let log_dir = dirs::log_dir();
        std::fs::create_dir_all(&log_dir)?;
        let file_appender = tracing_appender::rolling::never(&log_dir, "xtask.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_file)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if guard.is_some() {
        tracing::debug!("Log file: {}/xtask.log", dirs::log_dir().display());
    }
    Ok(guard)
}
