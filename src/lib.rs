//! Tracedeltas - analyzers for kernel time-delta trace summaries
//!
//! This library provides the shared pipeline behind the `td-dist`,
//! `td-summary` and `td-filter` binaries: classifying raw trace lines,
//! parsing them into structured records, aggregating per-function timing
//! statistics, and rendering tables or distribution charts.

pub mod classify;
pub mod distribution;
pub mod error;
pub mod forest;
pub mod plot;
pub mod record;
pub mod sample;
pub mod summary;
pub mod table;
pub mod tokenize;
