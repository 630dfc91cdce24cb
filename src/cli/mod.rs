//! CLI-specific utilities for pb
//!
//! This module contains configuration-file layering and logger setup,
//! separate from the core streaming library.

pub mod config;
pub mod logging;

pub use config::ConfigFile;
pub use logging::LogStyle;
