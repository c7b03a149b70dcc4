//! Cryptographic primitives for the trustmesh node.
//!
//! - **SHA-256** for document identity (blocks, transactions, inner hashes)
//! - A [`Digester`] seam so document code never names the algorithm directly

pub mod hash;

pub use hash::{hash_document, sha256, Digester, Sha256Digester};
