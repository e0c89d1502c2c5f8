//! Logging utilities.
//!
//! The engine logs through the `log` facade only; this module provides the
//! one-time `env_logger` setup used by binaries and tools.

mod init;

pub use init::{init_logging, LoggingConfig};
