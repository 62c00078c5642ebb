//! Entity log aggregation.
//!
//! This module pulls the tick-rate metric out of a file's rows, groups the
//! remaining observation rows by entity, and merges several files into one
//! row sequence with an averaged metric.

pub mod aggregate;
pub mod classify;
pub mod merge;
pub mod types;
pub mod utility;
