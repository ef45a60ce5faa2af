//! Function-sample filter for the distribution tool
//!
//! Scans a trace summary and collects the `t_delta_ns` values of one
//! function, keeping only records whose call-tree role (root vs child)
//! matches the requested one.

use tracing::debug;

use crate::classify;
use crate::error::Result;
use crate::record;

/// Collect the duration sample of `fun_name` from a trace summary.
///
/// `use_root_fn` selects root invocations (prefix `.`) instead of child
/// ones. The returned sample is empty when the function never appears with
/// the requested role; callers treat that as a data error.
pub fn function_sample(input: &str, fun_name: &str, use_root_fn: bool) -> Result<Vec<u64>> {
    let mut sample = Vec::new();
    for line in input.lines() {
        if !classify::is_summary_candidate(line) {
            continue;
        }
        let rec = record::parse_summary_delta(line)?;
        if rec.message == fun_name && use_root_fn == rec.is_root_call() {
            if let Some(ns) = rec.t_delta_ns() {
                sample.push(ns);
            }
        }
    }
    debug!(fun_name, use_root_fn, n = sample.len(), "collected sample");
    Ok(sample)
}
