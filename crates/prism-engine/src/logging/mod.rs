//! Logging utilities.
//!
//! Centralizes logger initialization for the tutorial binaries. Library code
//! only uses the `log` facade.

mod init;

pub use init::{LoggingConfig, init_logging};
