//! Summarize total execution time per instrumented source location

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tracedeltas::error::TraceError;
use tracedeltas::summary;

#[derive(Parser, Debug)]
#[command(name = "td-summary")]
#[command(version)]
#[command(about = "Print a per-location table of cumulative execution times from a kernel trace")]
struct Args {
    /// Raw trace file, e.g. /sys/kernel/debug/tracing/trace
    #[arg(value_name = "trace")]
    input_file: PathBuf,
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

    let buckets = summary::collect(&input)?;
    if buckets.totals.is_empty() {
        return Err(TraceError::NoTotalRecords { input: input_name }.into());
    }

    let reduced = summary::reduce_by_location(&buckets.totals);
    print!("{}", summary::render_table(&reduced));
    println!("t_tot sum: {:.3} us", summary::grand_total(&reduced));
    Ok(())
}
