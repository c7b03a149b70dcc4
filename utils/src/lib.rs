//! Shared utilities for trustmesh crates.

pub mod logging;
pub mod stats;

pub use logging::{init_logging, LogFormat, LogFormatError};
pub use stats::StatsCounter;
