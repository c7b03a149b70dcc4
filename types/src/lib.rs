//! Fundamental types for the trustmesh node.
//!
//! This crate defines the primitives shared across every other crate in the
//! workspace: public identifiers, document hashes, blockstamps, peer
//! endpoints, currency parameters, and the top-level error.

pub mod blockstamp;
pub mod endpoint;
pub mod error;
pub mod hash;
pub mod params;
pub mod pubkey;

pub use blockstamp::Blockstamp;
pub use endpoint::Endpoint;
pub use error::TrustmeshError;
pub use hash::DocumentHash;
pub use params::CurrencyParams;
pub use pubkey::Pubkey;
