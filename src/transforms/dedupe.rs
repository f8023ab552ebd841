//! Duplicate glyph removal.
//!
//! Regenerating the table appends freshly rasterized characters, so the same
//! glyph ends up in the table more than once. This transform keeps the first
//! entry for each (key, payload fingerprint) pair and drops the rest.

use std::collections::HashMap;

use tracing::info;

use super::Transform;
use crate::fingerprint::Fingerprint;
use crate::table::{Entry, Position};

/// Identity of a glyph entry: its key plus the fingerprint of its payload.
pub type DedupKey = (String, Fingerprint);

/// Record of one dropped duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateNotice {
    pub key: String,
    pub fingerprint: Fingerprint,
    /// Index the dropped entry carried in its annotation
    pub old_index: usize,
    /// Location of the dropped entry
    pub position: Position,
    /// Location of the retained entry it duplicates
    pub kept_at: Position,
}

/// Drops every entry whose [`DedupKey`] has already been seen.
///
/// **Policy**: first occurrence wins. Relative order of retained entries is
/// unchanged.
#[derive(Default)]
pub struct DeduplicateGlyphs {
    removed: Vec<DuplicateNotice>,
}

impl DeduplicateGlyphs {
    /// Create a new glyph deduplicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the count of dropped duplicates.
    pub fn deduped_count(&self) -> usize {
        self.removed.len()
    }

    /// Notices for every dropped duplicate, in source order.
    pub fn removed(&self) -> &[DuplicateNotice] {
        &self.removed
    }

    pub fn into_removed(self) -> Vec<DuplicateNotice> {
        self.removed
    }
}

impl Transform for DeduplicateGlyphs {
    fn transform(&mut self, entries: &mut Vec<Entry>) {
        let mut seen: HashMap<DedupKey, Position> = HashMap::with_capacity(entries.len());
        let mut kept = Vec::with_capacity(entries.len());

        for entry in entries.drain(..) {
            let fingerprint = Fingerprint::of(&entry.payload);
            let key = (entry.key.clone(), fingerprint);

            match seen.get(&key) {
                Some(&kept_at) => {
                    info!(
                        "Dropping duplicate '{}' (hash {}, {} bytes, index {}) at {}, first seen at {}",
                        entry.key,
                        fingerprint.short(),
                        entry.payload_tokens().count(),
                        entry.old_index,
                        entry.position,
                        kept_at
                    );
                    self.removed.push(DuplicateNotice {
                        key: entry.key,
                        fingerprint,
                        old_index: entry.old_index,
                        position: entry.position,
                        kept_at,
                    });
                }
                None => {
                    seen.insert(key, entry.position);
                    kept.push(entry);
                }
            }
        }

        *entries = kept;
    }
}
