//! The compaction pipeline: parse → deduplicate → reindex → render.
//!
//! [`compact`] is pure: it takes source text and returns output text plus a
//! [`Report`]. Reading, backing up and writing files is the job of
//! [`crate::runner`].

use std::time::Instant;

use tracing::debug;

use crate::error::CompactError;
use crate::table::{self, Layout};
use crate::transforms::{
    AnnotationMismatch, DeduplicateGlyphs, DuplicateNotice, Reindex, TransformChain,
};

/// Options for a single compaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactOptions {
    /// Table to process; the first declaration in the file when `None`
    pub table_name: Option<String>,
    pub layout: Layout,
}

/// What a compaction did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub table_name: String,
    pub original_entries: usize,
    pub retained_entries: usize,
    pub duplicates: Vec<DuplicateNotice>,
    pub mismatches: Vec<AnnotationMismatch>,
    /// Entries whose index text changed
    pub reindexed: usize,
    pub has_sentinel: bool,
}

impl Report {
    pub fn duplicates_removed(&self) -> usize {
        self.duplicates.len()
    }

    /// Whether the output differs from the input in content.
    pub fn changed(&self) -> bool {
        !self.duplicates.is_empty() || self.reindexed > 0
    }
}

/// Result of [`compact`]: the rewritten source and its report.
#[derive(Debug, Clone)]
pub struct Compaction {
    pub output: String,
    pub report: Report,
}

/// Deduplicate and reindex the glyph table in `source`.
pub fn compact(source: &str, options: &CompactOptions) -> Result<Compaction, CompactError> {
    let started = Instant::now();
    let mut doc = table::parse_named(source, options.table_name.as_deref())?;
    let original_entries = doc.entries.len();
    let parsed = Instant::now();

    let mut dedupe = DeduplicateGlyphs::new();
    let mut reindex = Reindex::new();
    TransformChain::new()
        .with(&mut dedupe)
        .with(&mut reindex)
        .apply(&mut doc.entries);
    let transformed = Instant::now();

    let output = doc.render(&options.layout);
    debug!(
        parse = ?parsed.duration_since(started),
        transform = ?transformed.duration_since(parsed),
        render = ?transformed.elapsed(),
        before = original_entries,
        after = doc.entries.len(),
        bytes_in = source.len(),
        bytes_out = output.len(),
        "compacted table {}",
        doc.name
    );

    Ok(Compaction {
        output,
        report: Report {
            table_name: doc.name,
            original_entries,
            retained_entries: doc.entries.len(),
            reindexed: reindex.rewritten_count(),
            duplicates: dedupe.into_removed(),
            mismatches: reindex.into_mismatches(),
            has_sentinel: doc.sentinel.is_some(),
        },
    })
}
