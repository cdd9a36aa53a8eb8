//! Logging setup.
//!
//! Everything logs through the `log` facade; this module only installs the
//! `env_logger` backend once, early in `main`.

mod init;

pub use init::{init_logging, resolve_filter, LoggingConfig, LOG_ENV};
