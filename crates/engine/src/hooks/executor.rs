//! Hook execution engine
//!
//! Runs every hook of a [`HookSequence`] in order, one at a time, forwarding
//! the arguments and environment the intercepted program was invoked with.
//! A failing hook never stops the chain; the first non-zero exit code is
//! remembered and becomes the overall result.

use super::config::{HookEntry, HookSequence};
use cuckoo_core::Error;
use std::ffi::OsString;
use std::path::Path;
use std::process::ExitStatus;

/// Exit code reported when a child has neither an exit code nor a signal
pub const UNKNOWN_STATUS: i32 = 255;

/// Exit code reported when a spawn fails without an OS error number
pub const LAUNCH_FAILURE: i32 = 127;

/// Base added to the signal number of a hook killed by a signal
pub const SIGNAL_BASE: i32 = 128;

/// Environment handed to every hook
pub type Environment = [(OsString, OsString)];

/// Outcome of launching one hook
#[derive(Debug)]
pub struct LaunchResult {
    /// Exit code folded into the chain result
    pub exit_code: i32,
    /// Set when the hook could not be started at all
    pub launch_error: Option<Error>,
}

impl LaunchResult {
    /// The hook ran and exited with `code`
    pub fn exited(code: i32) -> Self {
        Self {
            exit_code: code,
            launch_error: None,
        }
    }

    /// The hook could not be started
    pub fn failed(error: Error) -> Self {
        let exit_code = error
            .io_source()
            .and_then(std::io::Error::raw_os_error)
            .filter(|code| *code != 0)
            .unwrap_or(LAUNCH_FAILURE);
        Self {
            exit_code,
            launch_error: Some(error),
        }
    }

    /// `true` if the hook ran and exited 0
    pub fn is_success(&self) -> bool {
        self.exit_code == 0 && self.launch_error.is_none()
    }
}

/// Starts a hook and waits for it
pub trait Launcher {
    /// Run `executable` with `args` (excluding argv\[0\]) and exactly `env`
    fn launch(&self, executable: &Path, args: &[OsString], env: &Environment) -> LaunchResult;
}

/// Implement Launcher for closures
impl<F> Launcher for F
where
    F: Fn(&Path, &[OsString], &Environment) -> LaunchResult,
{
    fn launch(&self, executable: &Path, args: &[OsString], env: &Environment) -> LaunchResult {
        self(executable, args, env)
    }
}

/// Launches hooks as child processes
///
/// The child sees its own path as argv\[0\], inherits stdio, and gets the
/// given environment verbatim (nothing added, nothing inherited besides it).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    #[tracing::instrument(skip(self, args, env), fields(executable = %executable.display()))]
    fn launch(&self, executable: &Path, args: &[OsString], env: &Environment) -> LaunchResult {
        let expression = duct::cmd(executable, args.iter().cloned())
            .full_env(env.iter().cloned())
            .unchecked();

        match expression.run() {
            Ok(output) => {
                let code = exit_code_of(output.status);
                if output.status.code().is_none() {
                    tracing::warn!(exit_code = code, "Hook terminated by signal");
                }
                LaunchResult::exited(code)
            }
            Err(e) => LaunchResult::failed(Error::LaunchFailed {
                path: executable.to_path_buf(),
                source: e,
            }),
        }
    }
}

/// Map a child's exit status to an exit code
///
/// A hook killed by signal `n` yields `128 + n`, capped at 255.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return (SIGNAL_BASE + signal).min(UNKNOWN_STATUS);
        }
    }

    UNKNOWN_STATUS
}

/// What happened over a whole hook chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// First non-zero exit code, or 0
    pub exit_code: i32,
    /// Hooks that were attempted
    pub attempted: usize,
    /// Hooks that exited non-zero or could not be started
    pub failed: usize,
}

/// Hook chain runner
pub struct HookRunner<'a, L = ProcessLauncher>
where
    L: Launcher,
{
    args: &'a [OsString],
    env: &'a Environment,
    launcher: L,
}

impl<'a> HookRunner<'a, ProcessLauncher> {
    /// Create a runner that spawns real processes
    ///
    /// `args` are the arguments after argv\[0\]; `env` is passed to each hook unchanged.
    pub fn new(args: &'a [OsString], env: &'a Environment) -> Self {
        Self {
            args,
            env,
            launcher: ProcessLauncher,
        }
    }

    /// Swap the launcher, e.g. for a closure in tests
    pub fn launcher<L>(self, launcher: L) -> HookRunner<'a, L>
    where
        L: Launcher,
    {
        HookRunner {
            args: self.args,
            env: self.env,
            launcher,
        }
    }
}

impl<L> HookRunner<'_, L>
where
    L: Launcher,
{
    /// Run every hook in order and aggregate the exit codes
    #[tracing::instrument(skip_all, fields(hook_count = hooks.len()))]
    pub fn run(&self, hooks: &HookSequence) -> RunSummary {
        let mut summary = RunSummary::default();

        if hooks.is_empty() {
            tracing::debug!("No hooks to run");
            return summary;
        }

        for hook in hooks {
            let result = self.run_hook(hook);
            summary.attempted += 1;

            if !result.is_success() {
                summary.failed += 1;
                if summary.exit_code == 0 {
                    summary.exit_code = result.exit_code;
                }
            }
        }

        tracing::debug!(
            exit_code = summary.exit_code,
            attempted = summary.attempted,
            failed = summary.failed,
            "Hook chain finished"
        );
        summary
    }

    fn run_hook(&self, hook: &HookEntry) -> LaunchResult {
        let span = tracing::info_span!(
            "hook_execution",
            hook = %hook.path().display(),
            source = ?hook.source(),
        );
        let _guard = span.enter();

        let start = std::time::Instant::now();
        tracing::debug!("Starting hook");

        let mut result = self.launcher.launch(hook.path(), self.args, self.env);
        let elapsed = start.elapsed();

        if let Some(error) = &result.launch_error {
            tracing::error!(error = %error, exit_code = result.exit_code, "Hook could not be started");
        } else if result.exit_code == 0 {
            tracing::debug!(elapsed_ms = elapsed.as_millis(), "Hook completed successfully");
        } else {
            tracing::debug!(
                elapsed_ms = elapsed.as_millis(),
                exit_code = result.exit_code,
                "Hook failed, continuing with the rest"
            );
        }

        // a launch error always counts as a failure, even with a zero code
        if result.launch_error.is_some() && result.exit_code == 0 {
            result.exit_code = LAUNCH_FAILURE;
        }
        result
    }
}
