//! Reassembly of a [`TableDocument`] into C source text.

use super::TableDocument;

/// Line terminator used for the text the writer inserts itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Take the terminator of the header's last line, falling back to the
    /// first line break anywhere in `src`.
    pub fn detect(header: &str, src: &str) -> Self {
        let (text, at) = match header.rfind('\n') {
            Some(at) => (header, at),
            None => match src.find('\n') {
                Some(at) => (src, at),
                None => return Self::Lf,
            },
        };
        if text[..at].ends_with('\r') {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Layout of the rewritten table body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Indentation placed before every entry
    pub indent: String,
}

impl Layout {
    pub fn with_indent(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::with_indent(4)
    }
}

impl TableDocument {
    /// Render header, entries (sentinel last) and footer.
    ///
    /// Every entry, the last one included, is followed by a comma and a blank
    /// line, written with the document's [`LineEnding`]. Header and footer are
    /// emitted unchanged.
    pub fn render(&self, layout: &Layout) -> String {
        let items = self
            .entries
            .iter()
            .map(|e| e.raw_text())
            .chain(self.sentinel.as_deref());
        let newline = self.line_ending.as_str();

        let mut out = String::with_capacity(
            self.header.len()
                + self.footer.len()
                + self.entries.iter().map(|e| e.raw_text().len() + 8).sum::<usize>(),
        );
        out.push_str(&self.header);
        out.push_str(newline);
        for item in items {
            out.push_str(&layout.indent);
            out.push_str(item);
            out.push(',');
            out.push_str(newline);
            out.push_str(newline);
        }
        out.push_str(&self.footer);
        out
    }
}
