//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the router consumes is a trait; this crate provides
//! implementations that:
//! - return scripted values,
//! - record every call for later assertions,
//! - fail on demand,
//! - never touch the filesystem or network.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod directory;
pub mod peering;
pub mod random;

pub use directory::{DirectoryCall, NullPeerDirectory};
pub use peering::NullPeering;
pub use random::NullRandom;
