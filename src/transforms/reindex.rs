//! Sequential renumbering of annotation indices.

use tracing::warn;

use super::Transform;
use crate::table::{Entry, Position};

/// An entry whose annotation names a different key, so its index was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationMismatch {
    pub key: String,
    /// Key label found in the annotation
    pub annotation_key: String,
    pub old_index: usize,
    /// Index the entry would have received
    pub new_index: usize,
    pub position: Position,
}

/// Assigns every entry its rank as the new index.
///
/// Only the index digits of the entry's own `"<key>",<index>` annotation are
/// rewritten. Entries whose annotation carries another key keep their text
/// unchanged and are recorded as [`AnnotationMismatch`]es.
#[derive(Default)]
pub struct Reindex {
    rewritten: usize,
    mismatches: Vec<AnnotationMismatch>,
}

impl Reindex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries whose index text actually changed.
    pub fn rewritten_count(&self) -> usize {
        self.rewritten
    }

    pub fn mismatches(&self) -> &[AnnotationMismatch] {
        &self.mismatches
    }

    pub fn into_mismatches(self) -> Vec<AnnotationMismatch> {
        self.mismatches
    }
}

impl Transform for Reindex {
    fn transform(&mut self, entries: &mut Vec<Entry>) {
        for (rank, entry) in entries.iter_mut().enumerate() {
            if !entry.has_own_anchor() {
                warn!(
                    "Annotation of '{}' at {} names '{}'; index {} left as-is (expected {})",
                    entry.key, entry.position, entry.annotation_key, entry.old_index, rank
                );
                self.mismatches.push(AnnotationMismatch {
                    key: entry.key.clone(),
                    annotation_key: entry.annotation_key.clone(),
                    old_index: entry.old_index,
                    new_index: rank,
                    position: entry.position,
                });
                continue;
            }

            if entry.index_text() != rank.to_string() {
                entry.rewrite_index(rank);
                self.rewritten += 1;
            }
        }
    }
}
