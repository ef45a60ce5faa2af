//! Error taxonomy shared by the trace analyzers
//!
//! Configuration errors (bad output format) are raised before any input is
//! read; data errors (empty result sets) after the full scan; format errors
//! (lines that passed classification but do not tokenize) abort the run
//! with the offending line in the message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Output format not supported, please use one of the following ones: {supported}")]
    UnsupportedFormat { supported: String },

    #[error("function \"{fun_name}\" not found in {input}")]
    FunctionNotFound { fun_name: String, input: String },

    #[error("no total-duration records found in {input}")]
    NoTotalRecords { input: String },

    #[error("malformed trace line, expected at least {expected} fields but got {actual}: \"{line}\"")]
    MalformedLine {
        line: String,
        expected: usize,
        actual: usize,
    },

    #[error("malformed numeric field \"{token}\" in trace line: \"{line}\"")]
    BadNumber { token: String, line: String },
}

pub type Result<T> = std::result::Result<T, TraceError>;
