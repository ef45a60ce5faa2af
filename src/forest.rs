//! Root/child grouping and threshold filtering for the delta filter tool
//!
//! The instrumentation emits a flat stream of delta records in which nested
//! measures carry a `". "` record-name prefix. Grouping builds an explicit
//! shallow forest (each root owns the run of child records up to the next
//! root) before any filtering, so the grouping invariant is structural
//! rather than an indexing convention.

use std::io::{self, Write};

use tracing::debug;

use crate::classify::{self, LineKind};
use crate::error::Result;
use crate::record::{self, TraceRecord};

/// Width of the separator printed after each retained group.
pub const SEPARATOR_WIDTH: usize = 72;

/// One root record with the child measures that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct CallGroup {
    pub root: TraceRecord,
    pub children: Vec<TraceRecord>,
}

/// Thresholds applied per group.
#[derive(Debug, Clone, Copy)]
pub struct FilterPolicy {
    /// Groups whose root duration is below this are dropped whole.
    pub min_t_delta_ns: u64,
    /// Children below this fraction of the root duration are omitted.
    pub min_percentage: f64,
}

/// A retained child with its share of the root duration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedChild {
    pub record: TraceRecord,
    pub ratio: f64,
}

/// A group that survived the root threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedGroup {
    pub root: TraceRecord,
    pub children: Vec<RetainedChild>,
}

/// Parse the delta records of a raw trace.
///
/// Mean and total lines are recognized but do not enter the forest; lines
/// with the path marker and no known duration marker are reported verbatim.
pub fn collect_deltas(input: &str) -> Result<Vec<TraceRecord>> {
    let mut records = Vec::new();
    for raw in input.lines() {
        let Some(line) = classify::normalize(raw) else {
            continue;
        };
        match classify::classify(line) {
            Some(LineKind::Delta) => records.push(record::parse_filter_delta(line)?),
            Some(LineKind::Mean) | Some(LineKind::Total) => {
                debug!(line, "non-delta record, skipped")
            }
            None => classify::warn_unrecognized(line),
        }
    }
    Ok(records)
}

/// Group a record sequence into a forest: every non-child record starts a
/// new group, every child record belongs to the most recent root.
pub fn build_forest(records: Vec<TraceRecord>) -> Vec<CallGroup> {
    let mut groups: Vec<CallGroup> = Vec::new();
    for rec in records {
        if rec.is_child_measure() {
            match groups.last_mut() {
                Some(group) => group.children.push(rec),
                // a child before any root has no parent to attribute to
                None => debug!(message = %rec.message, "orphan child measure, skipped"),
            }
        } else {
            groups.push(CallGroup {
                root: rec,
                children: Vec::new(),
            });
        }
    }
    groups
}

/// Apply the thresholds. A zero-duration root (reachable only with
/// `min_t_delta_ns == 0`) never divides: all of its children are omitted.
pub fn filter_groups(forest: Vec<CallGroup>, policy: &FilterPolicy) -> Vec<RetainedGroup> {
    forest
        .into_iter()
        .filter_map(|group| {
            let root_delta = group.root.t_delta_ns().unwrap_or(0);
            if root_delta < policy.min_t_delta_ns {
                return None;
            }
            let children = group
                .children
                .into_iter()
                .filter_map(|child| {
                    if root_delta == 0 {
                        return None;
                    }
                    let ratio = child.t_delta_ns().unwrap_or(0) as f64 / root_delta as f64;
                    (ratio >= policy.min_percentage).then_some(RetainedChild {
                        record: child,
                        ratio,
                    })
                })
                .collect();
            Some(RetainedGroup {
                root: group.root,
                children,
            })
        })
        .collect()
}

/// Print retained groups as tab-delimited text. Each line re-parses to the
/// same location/message/duration through [`record::parse_filter_delta`].
pub fn write_groups<W: Write>(out: &mut W, groups: &[RetainedGroup]) -> io::Result<()> {
    for group in groups {
        writeln!(
            out,
            "{}\t{}\tt_delta: {} ns",
            group.root.location,
            group.root.message,
            group.root.t_delta_ns().unwrap_or(0)
        )?;
        for child in &group.children {
            writeln!(
                out,
                "{}\t{}\tt_delta: {} ns\t{:.2}%",
                child.record.location,
                child.record.message,
                child.record.t_delta_ns().unwrap_or(0),
                child.ratio * 100.0
            )?;
        }
        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    }
    Ok(())
}
