//! Cache hierarchy simulator CLI.
//!
//! This binary replays a memory trace against an L1 / victim / L2 hierarchy. It supports:
//! 1. **Positional run:** The classic `BLOCKSIZE L1_SIZE L1_ASSOC VC_SIZE L2_SIZE L2_ASSOC POLICY TRACE` form.
//! 2. **Config run:** `--config <file.json>` plus the trace path.
//! 3. **JSON output:** `--json` prints the report as JSON instead of text.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cachesim_core::Simulator;
use cachesim_core::common::SimError;
use cachesim_core::config::Config;
use cachesim_core::stats::Report;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven cache hierarchy simulator",
    long_about = "Replay a memory trace against an L1 cache with an optional victim cache and L2.\n\nPOLICY selects replacement: 2 = LRU, 3 = LFU, any other number = LRFU with that value as lambda.\n\nExamples:\n  cachesim 16 1024 2 0 0 0 2 traces/gcc.txt\n  cachesim 32 8192 4 256 65536 8 0.5 traces/gcc.txt\n  cachesim --config hierarchy.json traces/gcc.txt --json",
    override_usage = "cachesim <BLOCKSIZE> <L1_SIZE> <L1_ASSOC> <VC_SIZE> <L2_SIZE> <L2_ASSOC> <POLICY> <TRACE>\n       cachesim --config <FILE> <TRACE>"
)]
struct Cli {
    /// JSON configuration file; replaces the positional geometry arguments.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Geometry arguments followed by the trace file.
    #[arg(value_name = "ARGS", num_args = 1..=8)]
    args: Vec<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{e}");
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Replays the trace and prints the report.
fn run(cli: &Cli) -> Result<(), String> {
    let (config, trace) = resolve(cli)?;
    let report = simulate(config, &trace)?;
    if cli.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Builds the simulator and replays `trace` through it.
fn simulate(config: Config, trace: &Path) -> Result<Report, String> {
    let mut sim = Simulator::new(config).map_err(|e| SimError::from(e).to_string())?;
    let summary = sim.run_file(trace).map_err(|e| e.to_string())?;
    info!(
        trace = %trace.display(),
        events = summary.events,
        skipped = summary.skipped_lines,
        "replay finished"
    );
    Ok(sim.report(&trace.display().to_string()))
}

/// Turns the command line into a configuration and a trace path.
fn resolve(cli: &Cli) -> Result<(Config, PathBuf), String> {
    if let Some(path) = &cli.config {
        let [trace] = cli.args.as_slice() else {
            return Err("with --config, pass exactly one argument: the trace file".into());
        };
        let config = Config::from_json_file(path).map_err(|e| e.to_string())?;
        return Ok((config, PathBuf::from(trace)));
    }

    let [block, l1_size, l1_assoc, vc_size, l2_size, l2_assoc, policy, trace] =
        cli.args.as_slice()
    else {
        return Err(format!(
            "expected 8 positional arguments (BLOCKSIZE L1_SIZE L1_ASSOC VC_SIZE L2_SIZE L2_ASSOC POLICY TRACE), got {}",
            cli.args.len()
        ));
    };

    let config = Config::from_args(
        parse_size("BLOCKSIZE", block)?,
        parse_size("L1_SIZE", l1_size)?,
        parse_size("L1_ASSOC", l1_assoc)?,
        parse_size("VC_SIZE", vc_size)?,
        parse_size("L2_SIZE", l2_size)?,
        parse_size("L2_ASSOC", l2_assoc)?,
        policy
            .parse::<f64>()
            .map_err(|e| format!("POLICY: invalid number `{policy}`: {e}"))?,
    );
    Ok((config, PathBuf::from(trace)))
}

fn parse_size(name: &str, value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|e| format!("{name}: invalid value `{value}`: {e}"))
}
