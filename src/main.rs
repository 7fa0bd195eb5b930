//! Command-line host for the SAT engine: parses DIMACS inputs, dispatches
//! to the selected variant, and logs timings and statistics.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod command_line;

use command_line::cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    if run(&cli) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
