//! Argument parsing and the solve driver.
//!
//! The host selects a variant, collects the `.cnf` inputs, and runs each
//! through the façade, timing every call and logging verdict and engine
//! counters. Exit is successful regardless of SAT/UNSAT; only internal
//! errors (unreadable or malformed input) fail the process.

use clap::{Parser, ValueEnum};
use sat_engine::sat::cnf::Cnf;
use sat_engine::sat::dimacs::{parse_file, DimacsError};
use sat_engine::sat::solver::{solve_with_stats, Variant};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// File stems of the large benchmark instances, skipped unless
/// `--include-large` is given.
const LARGE_INSTANCES: [&str; 2] = ["uf175-01", "uuf150-01"];

/// A configurable SAT solver over DIMACS CNF files.
#[derive(Parser, Debug)]
#[command(name = "sat_engine", version, about = "A DP/DPLL SAT decision engine")]
pub(crate) struct Cli {
    /// A `.cnf` file or a directory of `.cnf` files to solve.
    pub path: PathBuf,

    /// The search procedure to run.
    #[arg(long, value_enum, default_value_t = VariantArg::DpllWatchers)]
    pub variant: VariantArg,

    /// Number of times each formula is solved (for timing stability).
    #[arg(long, default_value_t = 1)]
    pub runs: u32,

    /// Also solve the large benchmark instances.
    #[arg(long, default_value_t = false)]
    pub include_large: bool,

    /// Check each model against the input formula.
    #[arg(long, default_value_t = true)]
    pub verify: bool,

    /// Print the model of each satisfiable formula.
    #[arg(long, default_value_t = false)]
    pub print_solution: bool,

    /// Enable debug-level logging.
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,
}

/// The five search procedures, as command-line values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub(crate) enum VariantArg {
    DpDefault,
    Dp,
    ClassicalDpll,
    Dpll,
    DpllWatchers,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::DpDefault => Self::DpDefault,
            VariantArg::Dp => Self::Dp,
            VariantArg::ClassicalDpll => Self::ClassicalDpll,
            VariantArg::Dpll => Self::Dpll,
            VariantArg::DpllWatchers => Self::DpllWatchers,
        }
    }
}

/// Collects the `.cnf` files under `path`, sorted for reproducible run
/// order.
fn collect_inputs(path: &Path, include_large: bool) -> std::io::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?.path();
        if entry.extension().is_some_and(|e| e == "cnf") {
            let is_large = entry
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| LARGE_INSTANCES.contains(&stem));
            if is_large && !include_large {
                debug!(path = %entry.display(), "skipping large instance");
                continue;
            }
            files.push(entry);
        }
    }
    files.sort();
    Ok(files)
}

fn solve_one(path: &Path, variant: Variant, cli: &Cli) -> Result<Duration, DimacsError> {
    let cnf: Cnf = parse_file(path)?;
    info!(
        path = %path.display(),
        vars = cnf.num_vars - 1,
        clauses = cnf.len(),
        "starting {variant}"
    );

    let mut elapsed = Duration::ZERO;
    for _ in 0..cli.runs.max(1) {
        let start = Instant::now();
        let (result, stats) = solve_with_stats(cnf.clone(), variant);
        elapsed += start.elapsed();

        match &result {
            Some(model) => {
                info!(
                    decisions = stats.decisions,
                    propagations = stats.propagations,
                    inspections = stats.inspections,
                    "satisfiable in {:.3?}",
                    start.elapsed()
                );
                if cli.verify && !cnf.verify(model) {
                    error!(path = %path.display(), "model failed verification");
                }
                if cli.print_solution {
                    println!("v {model} 0");
                }
            }
            None => info!(
                decisions = stats.decisions,
                propagations = stats.propagations,
                inspections = stats.inspections,
                "unsatisfiable in {:.3?}",
                start.elapsed()
            ),
        }
        println!(
            "s {}",
            if result.is_some() {
                "SATISFIABLE"
            } else {
                "UNSATISFIABLE"
            }
        );
    }
    Ok(elapsed)
}

/// Runs the driver. Returns `false` when any input failed to parse.
pub(crate) fn run(cli: &Cli) -> bool {
    let variant = Variant::from(cli.variant);

    let inputs = match collect_inputs(&cli.path, cli.include_large) {
        Ok(inputs) => inputs,
        Err(e) => {
            error!(path = %cli.path.display(), "cannot read input: {e}");
            return false;
        }
    };
    if inputs.is_empty() {
        error!(path = %cli.path.display(), "no .cnf files found");
        return false;
    }

    let mut total = Duration::ZERO;
    let mut ok = true;
    for input in &inputs {
        match solve_one(input, variant, cli) {
            Ok(elapsed) => total += elapsed,
            Err(e) => {
                error!(path = %input.display(), "failed: {e}");
                ok = false;
            }
        }
    }
    info!("total time taken: {total:.3?}");
    ok
}
