//! SHA-256 hashing of canonical documents.

use sha2::{Digest, Sha256};
use trustmesh_types::DocumentHash;

/// Digest algorithm used to derive document identities.
///
/// Every node on the network must use the same implementation; the trait
/// only exists so document code can be exercised against a stub.
pub trait Digester {
    fn digest(&self, data: &[u8]) -> DocumentHash;
}

/// The network's document digest: SHA-256, rendered as uppercase hex.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Digester;

impl Digester for Sha256Digester {
    fn digest(&self, data: &[u8]) -> DocumentHash {
        DocumentHash::from_bytes(&sha256(data))
    }
}

/// Compute the SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash a raw document to its network identity.
pub fn hash_document(raw: &str) -> DocumentHash {
    Sha256Digester.digest(raw.as_bytes())
}
