//! CLI entry point for the two-bucket solver.
//!
//! Usage:
//!   two-bucket solve <CAPACITY_ONE> <CAPACITY_TWO> <GOAL> [--start one|two] [options]
//!   two-bucket solve-file <puzzle.json> [options]
//!   two-bucket solve-file --stdin [options]
//!
//! Options:
//!   --trace               Print every move of the solution
//!   --json                Print the result as JSON
//!   --max-states <n>      Give up after discovering n states
//!   --no-early-checks     Always run the full search
//!   -v, --verbose         Debug logging (RUST_LOG is honoured otherwise)
//!
//! Exit codes: 0 solved, 1 no solution, 2 invalid input.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use two_bucket::{
    solve_with_config, Bucket, BucketStats, PuzzleSpec, SearchStatistics, Solution, SolveError,
    SolverConfig, Step,
};

#[derive(Parser)]
#[command(name = "two-bucket")]
#[command(about = "Breadth-first solver for the two-bucket water puzzle")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle given on the command line
    Solve {
        /// Capacity of bucket one in liters
        capacity_one: u32,

        /// Capacity of bucket two in liters
        capacity_two: u32,

        /// Liters to measure
        goal: u32,

        /// Bucket filled by the first move (one, two, a, b)
        #[arg(long, default_value = "one")]
        start: Bucket,

        #[command(flatten)]
        options: SolveOptions,
    },

    /// Solve a puzzle read from a JSON file
    SolveFile {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        #[command(flatten)]
        options: SolveOptions,
    },
}

#[derive(Args)]
struct SolveOptions {
    /// Print every move of the solution
    #[arg(long)]
    trace: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Give up after discovering this many states
    #[arg(long)]
    max_states: Option<usize>,

    /// Skip the capacity and gcd checks and always run the full search
    #[arg(long)]
    no_early_checks: bool,
}

impl SolveOptions {
    fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            max_states: self.max_states,
            record_trace: self.trace,
            early_checks: !self.no_early_checks,
        }
    }
}

/// Output format for a solved puzzle
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput<'a> {
    #[serde(flatten)]
    stats: &'a BucketStats,
    #[serde(flatten)]
    search: &'a SearchStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [Step]>,
}

/// Output format for a failed solve
#[derive(Debug, Serialize)]
struct ErrorOutput {
    error: String,
    kind: &'static str,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Commands) -> Result<i32> {
    let (spec, options) = match command {
        Commands::Solve {
            capacity_one,
            capacity_two,
            goal,
            start,
            options,
        } => (
            PuzzleSpec {
                capacity_one,
                capacity_two,
                goal,
                start_bucket: start,
            },
            options,
        ),
        Commands::SolveFile {
            file,
            stdin,
            options,
        } => (read_puzzle(file, stdin)?, options),
    };

    let result = solve_with_config(&spec, &options.solver_config());

    match result {
        Ok(solution) => {
            if options.json {
                println!("{}", format_json(&solution)?);
            } else {
                print!("{}", format_text(&solution));
            }
            Ok(0)
        }
        Err(err) => {
            if options.json {
                let output = ErrorOutput {
                    error: err.to_string(),
                    kind: err.kind(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                eprintln!("{}", err);
            }
            Ok(exit_code(&err))
        }
    }
}

fn read_puzzle(file: Option<PathBuf>, stdin: bool) -> Result<PuzzleSpec> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read puzzle from stdin")?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        bail!("must provide either a file path or --stdin");
    };

    PuzzleSpec::from_json(&json_content).context("failed to parse puzzle JSON")
}

fn exit_code(err: &SolveError) -> i32 {
    match err {
        SolveError::InvalidSpec(_) => 2,
        SolveError::NoSolution { .. } | SolveError::StateBudgetExceeded { .. } => 1,
    }
}

fn format_json(solution: &Solution) -> Result<String> {
    let output = SolveOutput {
        stats: &solution.stats,
        search: &solution.search,
        trace: solution.trace.as_deref(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn format_text(solution: &Solution) -> String {
    let stats = &solution.stats;
    let mut out = format!(
        "moves={} goal_bucket={} other_bucket={}\n",
        stats.moves, stats.goal_bucket, stats.other_bucket
    );
    if let Some(trace) = &solution.trace {
        for (i, step) in trace.iter().enumerate() {
            out.push_str(&format!("{:>3}. {} -> {}\n", i + 1, step.action, step.state));
        }
    }
    out
}
