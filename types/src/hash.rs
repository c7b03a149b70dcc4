//! Content hash of a canonical document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex digest identifying a document on the network.
///
/// Digests computed locally are uppercase. A hash received with a document is
/// kept exactly as supplied, so a forwarded document carries the same text.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentHash(String);

impl DocumentHash {
    /// Hex length of a SHA-256 digest.
    pub const LEN: usize = 64;

    /// Adopt a hash as received, without normalising its case.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Build from raw digest bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode_upper(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this looks like a full 256-bit digest.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == Self::LEN && self.0.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl fmt::Debug for DocumentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.0.get(..8).unwrap_or(&self.0);
        write!(f, "DocumentHash({short}\u{2026})")
    }
}

impl fmt::Display for DocumentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
