//! Invoke mode
//!
//! cuckoo was started through an interception symlink. The symlink's own
//! name selects the hook directories; every hook found there is run with the
//! caller's arguments and environment.

use anyhow::Result;
use cuckoo_config::{Settings, Verbosity, logging};
use cuckoo_core::{Error, ResolvedPath, TargetLayout};
use cuckoo_engine::hooks::Environment;
use cuckoo_engine::{HookLoader, HookRunner, RunSummary};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Run invoke mode; returns the exit code to leave with
pub fn run(args: &[OsString], env: &Environment, settings: &Settings) -> i32 {
    if let Err(e) = logging::init(
        Verbosity::Quiet,
        settings.log_filter.as_deref(),
        settings.log_file.as_deref(),
    ) {
        eprintln!("cuckoo: {e}");
    }

    match execute(args, env, settings) {
        Ok(summary) => summary.exit_code,
        Err(e) => {
            tracing::error!("{e:#}");
            crate::exit_code_for(&e)
        }
    }
}

/// Discover and run the hooks for the program named by `args[0]`
pub fn execute(args: &[OsString], env: &Environment, settings: &Settings) -> Result<RunSummary> {
    let argv0 = args
        .first()
        .ok_or_else(|| Error::Usage("no program name to dispatch on".to_string()))?;

    let invoked = locate(argv0, env);
    let target = ResolvedPath::resolve(&invoked)?;
    if target.name().is_empty() {
        return Err(Error::UnsupportedType {
            path: target.into_path_buf(),
        }
        .into());
    }

    let layout = TargetLayout::new(&target);
    let common_dir = layout.common_dir(&settings.common_root);
    tracing::debug!(
        hook_dir = %layout.hook_dir().display(),
        common_dir = %common_dir.display(),
        "Dispatching {}",
        layout.name()
    );

    let hooks = HookLoader::new(layout.hook_dir(), common_dir).load()?;
    if hooks.is_empty() {
        tracing::debug!("No hooks for {}", layout.name());
    }

    let summary = HookRunner::new(&args[1..], env).run(&hooks);
    tracing::debug!(
        attempted = summary.attempted,
        failed = summary.failed,
        "Exiting with {}",
        summary.exit_code
    );
    Ok(summary)
}

/// Turn `argv[0]` into a path
///
/// A bare name (no `/`) means the shell found us on `$PATH`, so repeat that
/// search with the caller's `PATH`. Anything else is used as given.
fn locate(argv0: &OsStr, env: &Environment) -> PathBuf {
    let path = Path::new(argv0);
    let is_bare = path.parent().is_some_and(|p| p.as_os_str().is_empty());
    if !is_bare {
        return path.to_path_buf();
    }

    let search_path = env
        .iter()
        .find(|(key, _)| key == "PATH")
        .map(|(_, value)| value.clone());
    let found = std::env::current_dir()
        .ok()
        .and_then(|cwd| which::which_in(argv0, search_path, cwd).ok());

    match found {
        Some(found) => {
            tracing::debug!("Found {} at {}", path.display(), found.display());
            found
        }
        None => path.to_path_buf(),
    }
}
