//! Configuration management for cuckoo
//!
//! This crate handles:
//! - Runtime settings read from the environment
//! - Logging initialization

pub mod logging;
pub mod settings;

// Re-export error types from core
pub use cuckoo_core::{Error, Result};

pub use logging::Verbosity;
pub use settings::Settings;
