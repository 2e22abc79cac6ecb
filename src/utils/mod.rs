//! Ambient support for the binary.
//!
//! ## Modules
//!
//! - [`config`] - YAML config file with environment and CLI overrides
//! - [`logging`] - tracing subscriber setup
//! - [`progress`] - Spinner shown while a file is indexed (optional feature)

pub mod config;
pub mod logging;
pub mod progress;

pub use config::*;
pub use logging::*;
