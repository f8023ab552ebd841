//! Subcommand handlers for the binary.

pub mod compact;
pub mod completions;
