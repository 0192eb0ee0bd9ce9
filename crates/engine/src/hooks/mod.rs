//! Hook discovery and execution
//!
//! ## Execution Model
//!
//! - Hooks are the executable files directly inside the per-target directory
//!   (`<dir>/.<name>.d`) and the common directory (`<common-root>/<name>`)
//! - Both directories are merged and ordered by file name
//! - Hooks run strictly one after another; a hung hook blocks the chain
//! - Every hook is attempted; the first non-zero exit code is the result
//!
//! ## Module Organization
//!
//! - `config`: Hook data structures (`HookEntry`, `HookSequence`)
//! - `loader`: Hook discovery from the filesystem
//! - `executor`: Process launching and exit code aggregation

pub mod config;
pub mod executor;
pub mod loader;

// Re-export main types for convenience
pub use config::{HookEntry, HookSequence, HookSource};
pub use executor::{
    Environment, HookRunner, LaunchResult, Launcher, ProcessLauncher, RunSummary, exit_code_of,
};
pub use loader::HookLoader;
