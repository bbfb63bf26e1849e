//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only uses the `log` facade;
//! binaries and tests opt in to `env_logger` through [`init_logging`].

mod init;

pub use init::{LoggingConfig, init_logging};
