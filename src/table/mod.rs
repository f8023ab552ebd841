//! Glyph table model, parser and writer.
//!
//! A glyph table is a C array declaration emitted by the font rasterizer:
//!
//! ```c
//! const HZK_16_t HZK_16[] = {
//!     {"北",
//!      {0x80, 0x00, /* ... 32 bytes ... */}, /*"北",0*/
//!      /* (16 X 16 , 宋体 )*/},
//! };
//! ```
//!
//! The text before the body (header) and after it (footer) is never
//! interpreted, only carried through. Entries keep their original text so the
//! only edit ever applied to them is the index digits of the annotation.
//!
//! # Module Structure
//!
//! - [`lexer`] - Tokenizer with byte spans and line/column positions
//! - [`parser`] - Table declaration and entry extraction
//! - [`serialize`] - Reassembly of header, entries and footer

pub mod lexer;
pub mod parser;
pub mod serialize;

use std::fmt;
use std::ops::Range;

pub use parser::{parse, parse_named};
pub use serialize::{Layout, LineEnding};

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A syntax error in the table source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Parse error at line {}, column {}: {message}", .position.line, .position.column)]
pub struct ParseError {
    pub position: Position,
    pub message: String,
}

impl ParseError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// One character-to-bitmap record of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Character label as written between the quotes (escapes kept verbatim)
    pub key: String,
    /// Text between the payload braces, exactly as written
    pub payload: String,
    /// Index found in the annotation when the entry was parsed
    pub old_index: usize,
    /// Key label written in the annotation (normally equal to `key`)
    pub annotation_key: String,
    /// Location of the entry's opening brace
    pub position: Position,
    raw_text: String,
    index_span: Range<usize>,
}

impl Entry {
    pub(crate) fn new(
        key: String,
        payload: String,
        old_index: usize,
        annotation_key: String,
        position: Position,
        raw_text: String,
        index_span: Range<usize>,
    ) -> Self {
        Self {
            key,
            payload,
            old_index,
            annotation_key,
            position,
            raw_text,
            index_span,
        }
    }

    /// Full entry text, from the opening brace through the matching closing brace.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// The index currently written in the annotation.
    pub fn index_text(&self) -> &str {
        &self.raw_text[self.index_span.clone()]
    }

    /// Byte range of the annotation's index digits within [`Entry::raw_text`].
    pub fn index_span(&self) -> Range<usize> {
        self.index_span.clone()
    }

    /// Whether the annotation carries this entry's own `"<key>",<index>` anchor.
    pub fn has_own_anchor(&self) -> bool {
        self.annotation_key == self.key
    }

    /// Byte literal tokens of the payload, in order (`0x00`, `0x1F`, ...).
    pub fn payload_tokens(&self) -> impl Iterator<Item = &str> {
        self.payload
            .split(|c: char| c == ',' || c == '{' || c == '}' || c.is_whitespace())
            .filter(|token| !token.is_empty())
    }

    /// Replace the annotation's index digits, leaving every other byte untouched.
    pub(crate) fn rewrite_index(&mut self, new_index: usize) {
        let digits = new_index.to_string();
        let start = self.index_span.start;
        self.raw_text.replace_range(self.index_span.clone(), &digits);
        self.index_span = start..start + digits.len();
    }
}

/// A parsed table: verbatim header and footer around an ordered list of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDocument {
    /// Name of the table array (e.g. `HZK_16`)
    pub name: String,
    /// Source text up to and including the opening brace of the table body
    pub header: String,
    /// Entries in first-occurrence order
    pub entries: Vec<Entry>,
    /// Terminating zero-valued group, carried through verbatim
    pub sentinel: Option<String>,
    /// Source text from the closing brace of the table body onward
    pub footer: String,
    /// Line terminator of the source, reused for the rewritten body
    pub line_ending: LineEnding,
}
