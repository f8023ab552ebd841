//! Content fingerprints for glyph payloads.
//!
//! Two payloads are the same glyph when they contain the same characters once
//! all whitespace is removed. The digest is a full SHA-256; only the display
//! form is shortened.

use std::fmt;

use sha2::{Digest, Sha256};

/// Number of hex digits shown in log lines and reports.
pub const SHORT_LEN: usize = 8;

/// SHA-256 digest of a whitespace-normalized payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint a payload's text.
    pub fn of(payload: &str) -> Self {
        let normalized: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Self(digest)
    }

    /// Abbreviated hex form for human-facing output.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..SHORT_LEN / 2])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
