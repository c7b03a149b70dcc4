//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for the trustmesh node.
#[derive(Debug, Error)]
pub enum TrustmeshError {
    #[error("invalid blockstamp: {0}")]
    InvalidBlockstamp(String),

    #[error("{0}")]
    Other(String),
}
