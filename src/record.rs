//! Structured trace records and the per-shape parse functions
//!
//! A [`TraceRecord`] is created per classified input line, held in an
//! in-memory sequence for the duration of one run, and never mutated -
//! aggregation only groups, filters and sorts records into new collections.

use crate::classify;
use crate::error::{Result, TraceError};
use crate::tokenize::{self, LineShape};

/// Call-tree marker of a root (top-level) invocation.
pub const ROOT_PREFIX: &str = ".";

/// Record-name convention marking a nested measure inside a root one.
pub const CHILD_MESSAGE_PREFIX: &str = ". ";

/// The numeric payload of a record; exactly one variant per record,
/// determined by which marker matched during classification.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationShape {
    /// Single measured duration with an optional percentage of the parent
    /// root's time (0.00 when absent from the line).
    Delta { t_delta_ns: u64, t_delta_pct: f64 },
    /// Mean duration over repeated calls.
    Mean { t_mean_ns: u64 },
    /// Cumulative duration in microseconds plus the invocation count.
    Total { t_tot_us: f64, calls: u64 },
}

/// One parsed trace line.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    /// Source-file-and-line identifier, e.g. `block/bfq.c+123`.
    pub location: String,
    /// Call-tree prefix token (`.` or `` `-- ``); only the trace-summary
    /// line shape carries one.
    pub prefix: Option<String>,
    /// Function/symbol name.
    pub message: String,
    pub shape: DurationShape,
}

impl TraceRecord {
    /// Measured duration for delta-shaped records.
    pub fn t_delta_ns(&self) -> Option<u64> {
        match self.shape {
            DurationShape::Delta { t_delta_ns, .. } => Some(t_delta_ns),
            _ => None,
        }
    }

    /// Whether this record is a top-level invocation in a traced call chain.
    pub fn is_root_call(&self) -> bool {
        self.prefix.as_deref() == Some(ROOT_PREFIX)
    }

    /// Whether the record name follows the nested-measure convention.
    pub fn is_child_measure(&self) -> bool {
        self.message.starts_with(CHILD_MESSAGE_PREFIX)
    }
}

fn parse_u64(token: &str, line: &str) -> Result<u64> {
    token.parse().map_err(|_| TraceError::BadNumber {
        token: token.to_string(),
        line: line.to_string(),
    })
}

fn parse_f64(token: &str, line: &str) -> Result<f64> {
    token.parse().map_err(|_| TraceError::BadNumber {
        token: token.to_string(),
        line: line.to_string(),
    })
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Parse a trace-summary delta line:
/// `src.c +12 . root_fn 4144 ns` or
/// ``src.c +12 `-- child_fn 89 ns 2.15%``
pub fn parse_summary_delta(line: &str) -> Result<TraceRecord> {
    let padded = classify::with_percent(line);
    let shape = LineShape {
        location_tokens: tokenize::joined_or_split,
        has_prefix: true,
        trailing: 3,
    };
    let raw = tokenize::split_fields(&padded, &shape)?;
    let t_delta_ns = parse_u64(&raw.trailing[0], line)?;
    let t_delta_pct = parse_f64(raw.trailing[2].trim_end_matches('%'), line)?;
    Ok(TraceRecord {
        location: raw.location,
        prefix: raw.prefix,
        message: raw.message,
        shape: DurationShape::Delta {
            t_delta_ns,
            t_delta_pct,
        },
    })
}

/// Parse a kernel duration line: `block/bfq.c +123 name t_delta: 456 ns`
pub fn parse_kernel_delta(line: &str) -> Result<TraceRecord> {
    let shape = LineShape {
        location_tokens: tokenize::file_plus_line,
        has_prefix: false,
        trailing: 3,
    };
    let raw = tokenize::split_fields(line, &shape)?;
    let t_delta_ns = parse_u64(&raw.trailing[1], line)?;
    Ok(TraceRecord {
        location: raw.location,
        prefix: None,
        message: raw.message,
        shape: DurationShape::Delta {
            t_delta_ns,
            t_delta_pct: 0.0,
        },
    })
}

/// Parse a kernel mean-duration line: `block/bfq.c +123 name t_mean: 456 ns`
pub fn parse_kernel_mean(line: &str) -> Result<TraceRecord> {
    let shape = LineShape {
        location_tokens: tokenize::file_plus_line,
        has_prefix: false,
        trailing: 3,
    };
    let raw = tokenize::split_fields(line, &shape)?;
    let t_mean_ns = parse_u64(&raw.trailing[1], line)?;
    Ok(TraceRecord {
        location: raw.location,
        prefix: None,
        message: raw.message,
        shape: DurationShape::Mean { t_mean_ns },
    })
}

/// Parse a kernel cumulative line:
/// `block/bfq.c +123 name t_tot: 5000 ns, calls: 2`
///
/// The duration token is nanoseconds; it is stored as microseconds rounded
/// to 3 decimals.
pub fn parse_kernel_total(line: &str) -> Result<TraceRecord> {
    let shape = LineShape {
        location_tokens: tokenize::file_plus_line,
        has_prefix: false,
        trailing: 5,
    };
    let raw = tokenize::split_fields(line, &shape)?;
    let t_tot_ns = parse_f64(&raw.trailing[1], line)?;
    let calls = parse_u64(&raw.trailing[4], line)?;
    Ok(TraceRecord {
        location: raw.location,
        prefix: None,
        message: raw.message,
        shape: DurationShape::Total {
            t_tot_us: round3(t_tot_ns / 1000.0),
            calls,
        },
    })
}

/// Parse a delta line for the threshold filter. Accepts both the kernel
/// shape and the filter's own tab-delimited output (pre-joined location,
/// optional trailing percentage), so filter output re-parses to the same
/// record.
pub fn parse_filter_delta(line: &str) -> Result<TraceRecord> {
    let padded = classify::with_percent(line);
    let shape = LineShape {
        location_tokens: tokenize::joined_or_split,
        has_prefix: false,
        trailing: 4,
    };
    let raw = tokenize::split_fields(&padded, &shape)?;
    let t_delta_ns = parse_u64(&raw.trailing[1], line)?;
    let t_delta_pct = parse_f64(raw.trailing[3].trim_end_matches('%'), line)?;
    Ok(TraceRecord {
        location: raw.location,
        prefix: None,
        message: raw.message,
        shape: DurationShape::Delta {
            t_delta_ns,
            t_delta_pct,
        },
    })
}
