//! Unified positional tokenizer for fixed-format trace lines
//!
//! Every line shape handled by the tools follows the same layout: location
//! tokens, an optional call-tree prefix token, a variable-length message,
//! and a fixed count of trailing numeric tokens. The shapes differ only in
//! how many leading tokens form the location and how many tokens trail the
//! message, so one parameterized routine replaces per-tool parsers.
//!
//! Trailing tokens are addressed from the end of the token list because the
//! message has variable token length (demangled names may contain spaces).

use crate::error::{Result, TraceError};

/// Counts how many leading tokens form the location field.
pub type LocationRule = fn(&[&str]) -> usize;

/// Layout of one line shape.
#[derive(Clone, Copy)]
pub struct LineShape {
    /// Location-token counting rule.
    pub location_tokens: LocationRule,
    /// Whether a call-tree prefix token follows the location.
    pub has_prefix: bool,
    /// Number of trailing tokens after the message.
    pub trailing: usize,
}

/// Labeled raw fields of one tokenized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFields {
    /// Location tokens concatenated without separator, e.g. `block/bfq.c+123`.
    pub location: String,
    /// Call-tree prefix token, when the shape carries one.
    pub prefix: Option<String>,
    /// Space-joined tokens between the location and the trailing fields.
    pub message: String,
    /// The trailing tokens, in line order.
    pub trailing: Vec<String>,
}

/// Single location token; used by shapes whose file and line number are
/// already joined (`src.c+123`).
pub fn single_token(_tokens: &[&str]) -> usize {
    1
}

/// Kernel trace shape: a file token plus a `+line` token, with a third
/// token absorbed when printf padding split `+ 123` apart.
pub fn file_plus_line(tokens: &[&str]) -> usize {
    match tokens.get(1) {
        Some(&"+") => 3,
        _ => 2,
    }
}

/// Location rule tolerant of both the kernel shape and a pre-joined
/// `src.c+123` token: a second token is absorbed only when it continues
/// the location (a bare `+` pulls in the line number token as well).
pub fn joined_or_split(tokens: &[&str]) -> usize {
    match tokens.get(1) {
        Some(&"+") => 3,
        Some(t) if t.starts_with('+') => 2,
        _ => 1,
    }
}

/// Split a classified line into labeled raw fields.
///
/// Fails with [`TraceError::MalformedLine`] when the line has fewer tokens
/// than the shape requires. Callers are expected to pre-filter with the
/// classifier; a failure here aborts the run.
pub fn split_fields(line: &str, shape: &LineShape) -> Result<RawFields> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let location_len = (shape.location_tokens)(&tokens);
    let prefix_len = usize::from(shape.has_prefix);
    let expected = location_len + prefix_len + shape.trailing;
    if tokens.len() < expected {
        return Err(TraceError::MalformedLine {
            line: line.to_string(),
            expected,
            actual: tokens.len(),
        });
    }

    let location = tokens[..location_len].concat();
    let prefix = shape
        .has_prefix
        .then(|| tokens[location_len].to_string());
    let message = tokens[location_len + prefix_len..tokens.len() - shape.trailing].join(" ");
    let trailing = tokens[tokens.len() - shape.trailing..]
        .iter()
        .map(|t| (*t).to_string())
        .collect();

    Ok(RawFields {
        location,
        prefix,
        message,
        trailing,
    })
}
