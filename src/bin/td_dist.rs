//! Plot the probability distribution of a traced function's execution time

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tracedeltas::distribution::{DistributionStats, SampleDistribution};
use tracedeltas::error::TraceError;
use tracedeltas::plot::{self, PlotSpec};
use tracedeltas::sample;

const LONG_ABOUT: &str = "\
Given a trace summary like:
    src-file.c  +line_num  . root_function       4144 ns
    src-file.c  +line_num  `-- sub_function_1      89 ns     2.15%
    src-file.c  +line_num  `-- sub_function_2     303 ns     7.31%
    src-file.c  +line_num  `-- sub_function_3     442 ns    10.67%
    ...          ...           ...                ...        ...

and a function name (e.g. 'sub_function_3'), plots the probability
distribution of its execution time and prints some statistics.";

#[derive(Parser, Debug)]
#[command(name = "td-dist")]
#[command(version)]
#[command(about = "Plot the probability distribution of a traced function's execution time")]
#[command(long_about = LONG_ABOUT)]
struct Args {
    /// Trace summary file
    #[arg(value_name = "trace_summary.txt")]
    input_file: PathBuf,

    /// Function whose execution time probability distribution will be plotted
    #[arg(value_name = "function_name")]
    fun_name: String,

    /// Save the chart to a file (svg or png); without it the chart is drawn
    /// in the terminal
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Set the x-axis minimum to the value whose cumulative distribution is q
    #[arg(short = 'm', long = "min-cdf", value_name = "q")]
    min_cdf: Option<f64>,

    /// Set the x-axis maximum to the value whose cumulative distribution is q
    #[arg(short = 'M', long = "max-cdf", value_name = "q")]
    max_cdf: Option<f64>,

    /// Number of points used to plot the distribution
    #[arg(short, long, value_name = "int", default_value_t = 16384)]
    points: usize,

    /// Filter root functions instead of child ones
    #[arg(short = 'r', long = "use-root-fn")]
    use_root_fn: bool,
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

    // configuration check before any input I/O
    let format = args
        .output
        .as_deref()
        .map(plot::check_output_format)
        .transpose()?;

    let input_name = args.input_file.display().to_string();
    let input = fs::read_to_string(&args.input_file)
        .with_context(|| format!("reading {input_name}"))?;

    let sample = sample::function_sample(&input, &args.fun_name, args.use_root_fn)?;
    let dist =
        SampleDistribution::from_sample(&sample).ok_or_else(|| TraceError::FunctionNotFound {
            fun_name: args.fun_name.clone(),
            input: input_name.clone(),
        })?;
    let stats = DistributionStats::from_distribution(&dist);

    plot::print_statistics(&args.fun_name, &stats);

    let spec = PlotSpec {
        fun_name: &args.fun_name,
        input_name: &input_name,
        points: args.points,
        min_cdf: args.min_cdf,
        max_cdf: args.max_cdf,
    };
    match (&args.output, format) {
        (Some(path), Some(format)) => {
            plot::render_to_file(path, format, &dist, &stats, sample.len(), &spec)
                .with_context(|| format!("writing chart to {}", path.display()))?
        }
        _ => plot::render_terminal(&dist, &stats, sample.len(), &spec),
    }
    Ok(())
}
