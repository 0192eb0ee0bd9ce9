//! # Cuckoo Engine
//!
//! The moving parts behind cuckoo:
//!
//! - **Installer**: relocates a target executable into its hook directory
//!   and replaces it with a symlink to cuckoo
//! - **Hooks**: discovery of executables in the per-target and common hook
//!   directories, and sequential execution with first-failure aggregation
//! - **Access**: kernel-checked execute permission

pub mod access;
pub mod hooks;
pub mod installer;

// Re-export path and layout types from core
pub use cuckoo_core::{ResolvedPath, TargetLayout};

// Re-export error types from core
pub use cuckoo_core::{Error, Result};

// Re-export commonly used types
pub use hooks::{HookLoader, HookRunner, HookSequence, RunSummary};
pub use installer::{InstallOutcome, InstallReport, Installer};
