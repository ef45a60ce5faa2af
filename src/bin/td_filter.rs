//! Filter trace delta records by root duration and child share

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tracedeltas::forest::{self, FilterPolicy};

#[derive(Parser, Debug)]
#[command(name = "td-filter")]
#[command(version)]
#[command(about = "Print trace delta groups whose root duration and child shares pass thresholds")]
struct Args {
    /// Raw trace file, e.g. /sys/kernel/debug/tracing/trace
    #[arg(value_name = "trace")]
    input_file: PathBuf,

    /// Drop groups whose root duration is below this many nanoseconds
    #[arg(long = "t-delta-min", value_name = "NS", default_value_t = 1)]
    t_delta_min: u64,

    /// Print children whose share of the root duration is at least this fraction
    #[arg(long = "min-percentage", value_name = "FRACTION", default_value_t = 0.01)]
    min_percentage: f64,
}

/// Initialize tracing subscriber for debug output (RUST_LOG-controlled)
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let input_name = args.input_file.display().to_string();
    let input = fs::read_to_string(&args.input_file)
        .with_context(|| format!("reading {input_name}"))?;

    let records = forest::collect_deltas(&input)?;
    let groups = forest::build_forest(records);
    let retained = forest::filter_groups(
        groups,
        &FilterPolicy {
            min_t_delta_ns: args.t_delta_min,
            min_percentage: args.min_percentage,
        },
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    forest::write_groups(&mut out, &retained)?;
    out.flush()?;
    Ok(())
}
