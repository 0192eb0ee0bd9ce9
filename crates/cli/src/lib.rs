//! Cuckoo CLI library
//!
//! One binary, two behaviours. Run under its own name it installs itself in
//! front of an executable; run under any other name (through an installed
//! symlink) it runs the hooks collected for that name.

pub mod cmd;

use cuckoo_config::Settings;
use cuckoo_core::INSTALLER_NAME;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// What the process was started to do, decided once from `argv[0]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Started as `cuckoo`: intercept the executable named on the command line
    Install,
    /// Started through an interception symlink: run its hooks
    Invoke,
}

impl Mode {
    /// Pick the mode from the program name the process was started with
    pub fn from_argv0(argv0: &OsStr) -> Self {
        if Path::new(argv0).file_name() == Some(OsStr::new(INSTALLER_NAME)) {
            Mode::Install
        } else {
            Mode::Invoke
        }
    }
}

/// Run cuckoo with a full argument vector (including `argv[0]`)
///
/// Returns the process exit code.
pub fn run(args: Vec<OsString>) -> i32 {
    let settings = Settings::from_env();
    let mode = args
        .first()
        .map_or(Mode::Install, |argv0| Mode::from_argv0(argv0));

    match mode {
        Mode::Install => cmd::install::run(&args, &settings),
        Mode::Invoke => {
            let env: Vec<(OsString, OsString)> = std::env::vars_os().collect();
            cmd::invoke::run(&args, &env, &settings)
        }
    }
}

/// Exit code for an error that reached the outer edge of the program
pub(crate) fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<cuckoo_core::Error>()
        .map_or(cuckoo_core::error::GENERIC_FAILURE, cuckoo_core::Error::exit_code)
}
