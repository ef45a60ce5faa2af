//! Per-location aggregation for the summary tool
//!
//! Buckets every recognized kernel trace line by duration shape, then
//! reduces the cumulative records to one per source location and renders
//! them as a table sorted by total time.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use crate::classify::{self, LineKind};
use crate::error::Result;
use crate::record::{self, DurationShape, TraceRecord};
use crate::table::{self, Column};

/// All recognized records of one trace, bucketed by duration shape.
#[derive(Debug, Default)]
pub struct TraceBuckets {
    pub deltas: Vec<TraceRecord>,
    pub means: Vec<TraceRecord>,
    pub totals: Vec<TraceRecord>,
}

/// Classify and parse every line of a raw trace.
///
/// Lines without the path marker are skipped; lines carrying the marker but
/// no known duration marker are reported verbatim on stdout.
pub fn collect(input: &str) -> Result<TraceBuckets> {
    let mut buckets = TraceBuckets::default();
    for raw in input.lines() {
        let Some(line) = classify::normalize(raw) else {
            continue;
        };
        match classify::classify(line) {
            Some(LineKind::Delta) => buckets.deltas.push(record::parse_kernel_delta(line)?),
            Some(LineKind::Mean) => buckets.means.push(record::parse_kernel_mean(line)?),
            Some(LineKind::Total) => buckets.totals.push(record::parse_kernel_total(line)?),
            None => classify::warn_unrecognized(line),
        }
    }
    debug!(
        deltas = buckets.deltas.len(),
        means = buckets.means.len(),
        totals = buckets.totals.len(),
        "collected trace records"
    );
    Ok(buckets)
}

/// Ranking key for records sharing a location: the sum of total
/// microseconds and raw call count. The unit-mismatched addition is the
/// historical behavior and is pinned by tests; do not "fix" it without a
/// product decision.
pub fn composite_key(rec: &TraceRecord) -> f64 {
    match rec.shape {
        DurationShape::Total { t_tot_us, calls } => t_tot_us + calls as f64,
        _ => f64::NEG_INFINITY,
    }
}

fn t_tot_us(rec: &TraceRecord) -> f64 {
    match rec.shape {
        DurationShape::Total { t_tot_us, .. } => t_tot_us,
        _ => 0.0,
    }
}

/// Keep the single highest-ranking record per location, sorted by total
/// time descending. Ties keep the earliest record, matching a stable
/// descending sort over the input order.
pub fn reduce_by_location(totals: &[TraceRecord]) -> Vec<TraceRecord> {
    let mut best: HashMap<&str, &TraceRecord> = HashMap::new();
    for rec in totals {
        match best.entry(rec.location.as_str()) {
            Entry::Occupied(mut entry) => {
                if composite_key(rec) > composite_key(entry.get()) {
                    entry.insert(rec);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(rec);
            }
        }
    }
    let mut reduced: Vec<TraceRecord> = best.into_values().cloned().collect();
    reduced.sort_by(|a, b| {
        t_tot_us(b)
            .partial_cmp(&t_tot_us(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    reduced
}

/// Sum of total microseconds over the reduced set (not the raw set).
pub fn grand_total(reduced: &[TraceRecord]) -> f64 {
    reduced.iter().map(t_tot_us).sum()
}

/// Render the reduced records as a bordered table.
pub fn render_table(reduced: &[TraceRecord]) -> String {
    let columns = [
        Column::left("location"),
        Column::left("message"),
        Column::right("t_tot_us"),
        Column::right("calls"),
    ];
    let rows: Vec<Vec<String>> = reduced
        .iter()
        .filter_map(|rec| match rec.shape {
            DurationShape::Total { t_tot_us, calls } => Some(vec![
                rec.location.clone(),
                rec.message.clone(),
                format!("{t_tot_us:.3}"),
                calls.to_string(),
            ]),
            _ => None,
        })
        .collect();
    table::render(&columns, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(location: &str, message: &str, t_tot_us: f64, calls: u64) -> TraceRecord {
        TraceRecord {
            location: location.to_string(),
            prefix: None,
            message: message.to_string(),
            shape: DurationShape::Total { t_tot_us, calls },
        }
    }

    #[test]
    fn test_collect_buckets_by_marker() {
        let input = "\
block/bfq.c + 100 dispatch t_delta: 456 ns
block/bfq.c + 100 dispatch t_mean: 77 ns
block/bfq.c + 100 dispatch t_tot: 5000 ns, calls: 2
";
        let buckets = collect(input).unwrap();
        assert_eq!(buckets.deltas.len(), 1);
        assert_eq!(buckets.means.len(), 1);
        assert_eq!(buckets.totals.len(), 1);
    }

    #[test]
    fn test_composite_key_prefers_high_call_counts() {
        // (t_tot_us=5.0, calls=2) vs (t_tot_us=3.0, calls=10):
        // the second wins on the composite key (13.0 > 7.0) despite
        // the lower total time
        let a = total("block/a.c+1", "fn_a", 5.0, 2);
        let b = total("block/a.c+1", "fn_b", 3.0, 10);
        let reduced = reduce_by_location(&[a, b.clone()]);
        assert_eq!(reduced, vec![b]);
    }

    #[test]
    fn test_reduce_keeps_one_record_per_location() {
        let records = [
            total("block/a.c+1", "x", 9.0, 1),
            total("block/a.c+1", "x", 2.0, 1),
            total("block/b.c+2", "y", 4.0, 3),
        ];
        let reduced = reduce_by_location(&records);
        assert_eq!(reduced.len(), 2);
        // sorted by t_tot_us descending
        assert_eq!(reduced[0].location, "block/a.c+1");
        assert_eq!(reduced[1].location, "block/b.c+2");
    }

    #[test]
    fn test_reduce_is_idempotent() {
        let records = [
            total("block/a.c+1", "x", 9.0, 1),
            total("block/a.c+1", "x", 2.0, 8),
            total("block/b.c+2", "y", 4.0, 3),
            total("block/c.c+3", "z", 6.0, 2),
        ];
        let once = reduce_by_location(&records);
        let twice = reduce_by_location(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_grand_total_sums_reduced_set_only() {
        let records = [
            total("block/a.c+1", "x", 9.0, 1),
            total("block/a.c+1", "x", 2.0, 1),
            total("block/b.c+2", "y", 4.0, 3),
        ];
        let reduced = reduce_by_location(&records);
        assert!((grand_total(&reduced) - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_keeps_earliest_record() {
        let first = total("block/a.c+1", "first", 5.0, 5);
        let second = total("block/a.c+1", "second", 4.0, 6);
        let reduced = reduce_by_location(&[first.clone(), second]);
        assert_eq!(reduced, vec![first]);
    }

    #[test]
    fn test_render_table_has_headers_and_rows() {
        let reduced = [total("block/a.c+1", "dispatch", 5.0, 2)];
        let rendered = render_table(&reduced);
        assert!(rendered.contains("location"));
        assert!(rendered.contains("t_tot_us"));
        assert!(rendered.contains("block/a.c+1"));
        assert!(rendered.contains("5.000"));
    }
}
