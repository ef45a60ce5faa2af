//! Line classification for raw trace output
//!
//! Decides which input lines are candidate timing records and which duration
//! shape they carry. Everything else (headers, blank lines, unrelated trace
//! events) is skipped before the tokenizer ever sees it.

use std::borrow::Cow;

use tracing::debug;

/// Path marker identifying lines emitted by the time-delta instrumentation.
pub const PATH_MARKER: &str = "block/";

/// Duration shape carried by a classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Single measured duration (`t_delta: <ns> ns`)
    Delta,
    /// Mean duration over repeated calls (`t_mean: <ns> ns`)
    Mean,
    /// Cumulative duration and call count (`t_tot: <ns> ns, calls: <n>`)
    Total,
}

/// Rewrite a line to start at the path marker, stripping any leading
/// decoration added by differently-indented trace emitters.
///
/// Returns `None` when the marker is absent, which disqualifies the line.
pub fn normalize(line: &str) -> Option<&str> {
    line.find(PATH_MARKER).map(|pos| &line[pos..])
}

/// Tag a normalized line with its duration shape.
///
/// `None` means the line carries the path marker but no known duration
/// marker; callers report those verbatim so a human can extend the
/// classifier for new marker types.
pub fn classify(line: &str) -> Option<LineKind> {
    if line.contains("t_delta") {
        Some(LineKind::Delta)
    } else if line.contains("t_mean") {
        Some(LineKind::Mean)
    } else if line.contains("t_tot") {
        Some(LineKind::Total)
    } else {
        debug!(line, "no duration marker");
        None
    }
}

/// Candidate check for the trace-summary shape: any line carrying a
/// nanosecond token.
pub fn is_summary_candidate(line: &str) -> bool {
    line.contains("ns")
}

/// Append a synthetic `0.00%` token to delta lines that lack a percentage,
/// keeping the trailing field offsets valid for the tokenizer.
pub fn with_percent(line: &str) -> Cow<'_, str> {
    if line.contains('%') {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(format!("{line} 0.00%"))
    }
}

/// Report a plausible-but-unrecognized line so the classifier can be
/// extended for new marker types. Matches the historical wording.
pub fn warn_unrecognized(line: &str) {
    println!("WARNING unrecognized line \"{line}\"");
}
