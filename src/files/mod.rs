//! File-system steps around the pure pipeline: backup and atomic output.

pub mod backup;
pub mod output;
