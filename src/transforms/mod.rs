//! Table transforms applied between parsing and rendering.
//!
//! Each transform mutates the entry list in place and keeps its own record of
//! what it did, so the pipeline can report it afterwards.

mod dedupe;
mod reindex;

pub use dedupe::{DedupKey, DeduplicateGlyphs, DuplicateNotice};
pub use reindex::{AnnotationMismatch, Reindex};

use crate::table::Entry;

/// An in-place transformation of a table's entries.
pub trait Transform {
    fn transform(&mut self, entries: &mut Vec<Entry>);
}

/// Applies a sequence of transforms in order.
pub struct TransformChain<'a> {
    transforms: Vec<&'a mut dyn Transform>,
}

impl<'a> TransformChain<'a> {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    pub fn with(mut self, transform: &'a mut dyn Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn apply(&mut self, entries: &mut Vec<Entry>) {
        for transform in self.transforms.iter_mut() {
            transform.transform(entries);
        }
    }
}

impl Default for TransformChain<'_> {
    fn default() -> Self {
        Self::new()
    }
}
