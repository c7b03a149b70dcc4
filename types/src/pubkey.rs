//! Public identifier of a node, member, or document issuer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A base58-encoded Ed25519 public key, kept in its textual wire form.
///
/// Documents reference issuers, signers, and peers by this string; the router
/// compares it against the local node's key to tell self-originated documents
/// from relayed ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pubkey(String);

impl Pubkey {
    /// Base58 alphabet used by the network's key encoding.
    const ALPHABET: &'static str =
        "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the key is made of 43 or 44 base58 characters.
    pub fn is_valid(&self) -> bool {
        (43..=44).contains(&self.0.len()) && self.0.chars().all(|c| Self::ALPHABET.contains(c))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Pubkey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Pubkey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for Pubkey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Pubkey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_key() {
        let key = Pubkey::new("HgTTJLAQ5sqfknMq7yLPZbehtuLSsKj9CxWN7k8QvYJd");
        assert!(key.is_valid());
    }

    #[test]
    fn rejects_zero_and_short_keys() {
        assert!(!Pubkey::new("0gTTJLAQ5sqfknMq7yLPZbehtuLSsKj9CxWN7k8QvYJd").is_valid());
        assert!(!Pubkey::new("HgTTJLAQ").is_valid());
        assert!(!Pubkey::default().is_valid());
    }

    #[test]
    fn compares_with_str() {
        let key = Pubkey::from("abc");
        assert_eq!(key, "abc");
        assert_eq!(key.to_string(), "abc");
    }
}
