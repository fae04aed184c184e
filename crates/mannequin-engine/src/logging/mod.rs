//! Logging utilities.
//!
//! The engine only logs through the `log` facade. Binaries call
//! [`init_logging`] to install `env_logger`; libraries embedding the engine
//! may install their own logger instead.

mod init;

pub use init::{init_logging, LoggingConfig};