//! Core types and utilities for cuckoo
//!
//! This is the foundation crate (Layer 0) that all other cuckoo crates depend on.
//! It provides:
//! - The error taxonomy shared by the installer, discoverer and launcher
//! - [`ResolvedPath`], the canonical directory + name split of a path
//! - The on-disk layout conventions (hook directory, relocation name)
//!
//! This crate has no dependencies on other cuckoo crates.

pub mod error;
pub mod layout;
pub mod path;

pub use error::{Error, Result};
pub use layout::{INSTALLER_NAME, RELOCATION_PREFIX, TargetLayout};
pub use path::ResolvedPath;
