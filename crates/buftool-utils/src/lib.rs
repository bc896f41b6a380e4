//! # buftool Utilities
//!
//! Logging setup shared by the buftool binaries.
//!
//! This crate wires `tracing` to a subscriber configured from command-line
//! flags and environment variables. Library code (`buftool-core`) only emits
//! events; deciding where they go happens here.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with, init_logging_with_level, LogFormat, LogLevel, LoggingError, LoggingGuard};
pub use tracing::{debug, error, info, trace, warn};
