//! hzk-compact - deduplicate and reindex generated glyph bitmap tables.
//!
//! The font rasterizer for the WeatherClock firmware emits a C table of
//! 16x16 glyphs, one entry per requested character, each annotated with a
//! sequential index. Regenerating the table over time leaves duplicate
//! glyphs behind. This crate parses such a table, drops entries whose key and
//! bitmap were already seen, renumbers the survivors and writes the table
//! back with its surrounding text untouched.
//!
//! The core is [`pipeline::compact`], a pure text-to-text function.
//! [`runner::Compactor`] wraps it with the file handling: input checks,
//! backup and atomic output.

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod fingerprint;
pub mod pipeline;
pub mod runner;
pub mod table;
pub mod theme;
pub mod transforms;

pub use config::Config;
pub use error::CompactError;
pub use fingerprint::Fingerprint;
pub use pipeline::{compact, CompactOptions, Compaction, Report};
pub use runner::{Compactor, RunOptions, Summary};
pub use table::{Entry, TableDocument};
