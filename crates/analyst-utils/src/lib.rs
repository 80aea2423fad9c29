//! Shared utilities for analyst-rs
//!
//! Logging setup and application-level configuration used by the binary.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
