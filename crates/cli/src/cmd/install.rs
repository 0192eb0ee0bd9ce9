//! Install mode
//!
//! `cuckoo [--verbose] [--log-file FILE] <TARGET>` moves `TARGET` into its
//! hook directory and replaces it with a symlink to this binary.

use anyhow::{Context, Result};
use clap::Parser;
use cuckoo_config::{Settings, Verbosity, logging};
use cuckoo_core::Error;
use cuckoo_engine::{InstallOutcome, Installer};
use owo_colors::{OwoColorize, Style};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Intercept an executable so every call to it runs a set of hooks
#[derive(Debug, Parser)]
#[command(name = "cuckoo")]
#[command(version)]
#[command(long_about = "Intercept an executable so every call to it runs a set of hooks

Creates a hook directory next to TARGET and moves the executable found at
TARGET into it. A symlink is then created at TARGET that points to cuckoo.

When cuckoo is invoked through the symlink, it runs every executable in the
hook directory (and in the common hook directory for that name) in file name
order, passing each one the same arguments and environment it was invoked
with. The original executable runs as one of those hooks, so callers see the
same program they always did, with the extra hooks around it.

Example:
  cuckoo /usr/bin/foobar
    /usr/bin/foobar          -> /usr/bin/.foobar.d/50-foobar
    /usr/bin/foobar          is now a symlink to cuckoo
    /usr/bin/.foobar.d/      add hooks here, e.g. 10-before and 90-after
    /etc/cuckoo/foobar/      hooks shared by every foobar on the system

Environment:
  CUCKOO_COMMON_ROOT  root of the common hook directories (default /etc/cuckoo)
  CUCKOO_LOG          log filter, e.g. 'debug'
  CUCKOO_LOG_FILE     append logs to this file")]
pub struct InstallArgs {
    /// Path of the executable to intercept
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Run install mode with the full argument vector; returns the exit code
pub fn run(args: &[OsString], settings: &Settings) -> i32 {
    let cli = match InstallArgs::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too, with exit code 0
            let _ = e.print();
            return e.exit_code();
        }
    };

    let verbosity = if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    let log_file = cli.log_file.as_deref().or(settings.log_file.as_deref());
    let color = std::io::stderr().is_terminal();
    if let Err(e) = logging::init(verbosity, settings.log_filter.as_deref(), log_file) {
        eprintln!("{} {e}", paint("warning:", Style::new().yellow(), color));
    }

    match execute(&cli.target) {
        Ok(outcome) => {
            eprintln!("{}", format_outcome(&outcome, color));
            0
        }
        Err(e) => {
            print_error(&e, color);
            crate::exit_code_for(&e)
        }
    }
}

/// Intercept `target` with the running cuckoo binary
pub fn execute(target: &Path) -> Result<InstallOutcome> {
    let installer = Installer::for_current_exe().context("cannot install cuckoo")?;
    tracing::debug!("Installing {}", installer.self_path().display());
    Ok(installer.install(target)?)
}

/// Apply `style` only when writing to a terminal
fn paint(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

fn format_outcome(outcome: &InstallOutcome, color: bool) -> String {
    match outcome {
        InstallOutcome::Installed(report) => {
            let dim = Style::new().dimmed();
            format!(
                "{} {}\n  {}    {}\n  {}  {}\n  {}  {}",
                paint("Intercepted", Style::new().green().bold(), color),
                report.target.display(),
                paint("via", dim, color),
                report.self_path.display(),
                paint("moved", dim, color),
                report.relocated.display(),
                paint("hooks", dim, color),
                report.hook_dir.display()
            )
        }
        InstallOutcome::AlreadyInstalled { target, points_to } => {
            let points_to = points_to
                .as_ref()
                .map(|p| format!(" -> {}", p.display()))
                .unwrap_or_default();
            format!(
                "{} {}{} is already a symbolic link",
                paint("Skipped", Style::new().yellow().bold(), color),
                target.display(),
                paint(&points_to, Style::new().dimmed(), color)
            )
        }
    }
}

fn print_error(error: &anyhow::Error, color: bool) {
    let report = miette::Report::msg(format!("{error:#}"));
    eprintln!("{report:?}");

    if let Some(Error::Symlink {
        link,
        target,
        relocated,
        ..
    }) = error.downcast_ref::<Error>()
    {
        eprintln!(
            "{}",
            paint(
                "The original executable was moved, but nothing was put in its place.",
                Style::new().yellow(),
                color
            )
        );
        eprintln!(
            "  to finish: ln -s '{}' '{}'",
            target.display(),
            link.display()
        );
        eprintln!(
            "  to undo:   mv '{}' '{}'",
            relocated.display(),
            link.display()
        );
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use clap::error::ErrorKind;
    use cuckoo_engine::InstallReport;
    use tempfile::TempDir;

    fn argv(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_parse_single_target() {
        let cli = InstallArgs::try_parse_from(argv(&["cuckoo", "/usr/bin/foobar"])).unwrap();
        assert_eq!(cli.target, PathBuf::from("/usr/bin/foobar"));
        assert!(!cli.verbose);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let cli = InstallArgs::try_parse_from(argv(&[
            "cuckoo",
            "-v",
            "--log-file",
            "/tmp/cuckoo.log",
            "foobar",
        ]))
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/cuckoo.log")));
        assert_eq!(cli.target, PathBuf::from("foobar"));
    }

    #[test]
    fn test_missing_target_is_usage_error() {
        let err = InstallArgs::try_parse_from(argv(&["cuckoo"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_extra_target_is_usage_error() {
        let err = InstallArgs::try_parse_from(argv(&["cuckoo", "a", "b"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_help_and_version_are_not_errors() {
        let help = InstallArgs::try_parse_from(argv(&["cuckoo", "--help"])).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
        assert_eq!(help.exit_code(), 0);

        let version = InstallArgs::try_parse_from(argv(&["cuckoo", "--version"])).unwrap_err();
        assert_eq!(version.kind(), ErrorKind::DisplayVersion);
        assert_eq!(version.exit_code(), 0);
    }

    fn sample_outcome() -> InstallOutcome {
        InstallOutcome::Installed(InstallReport {
            self_path: PathBuf::from("/usr/local/bin/cuckoo"),
            target: PathBuf::from("/usr/bin/foobar"),
            hook_dir: PathBuf::from("/usr/bin/.foobar.d"),
            relocated: PathBuf::from("/usr/bin/.foobar.d/50-foobar"),
        })
    }

    #[test]
    fn test_outcome_without_color_has_no_escapes() {
        let text = format_outcome(&sample_outcome(), false);

        assert!(!text.contains('\x1b'));
        assert!(text.starts_with("Intercepted /usr/bin/foobar"));
        assert!(text.contains("hooks  /usr/bin/.foobar.d"));

        let skipped = format_outcome(
            &InstallOutcome::AlreadyInstalled {
                target: PathBuf::from("/usr/bin/foobar"),
                points_to: Some(PathBuf::from("/usr/local/bin/cuckoo")),
            },
            false,
        );
        assert_eq!(
            skipped,
            "Skipped /usr/bin/foobar -> /usr/local/bin/cuckoo is already a symbolic link"
        );
    }

    #[test]
    fn test_outcome_with_color_is_styled() {
        let text = format_outcome(&sample_outcome(), true);
        assert!(text.contains('\x1b'));
        assert!(text.contains("/usr/bin/.foobar.d/50-foobar"));
    }

    #[test]
    fn test_run_usage_error_exit_code() {
        let code = run(&argv(&["cuckoo"]), &Settings::default());
        assert_eq!(code, 2);
    }

    #[test]
    fn test_run_missing_target_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let code = run(
            &[OsString::from("cuckoo"), missing.into_os_string()],
            &Settings::default(),
        );
        assert_eq!(code, 2);
    }

    #[test]
    fn test_run_directory_target_fails() {
        let temp = TempDir::new().unwrap();

        let code = run(
            &[OsString::from("cuckoo"), temp.path().as_os_str().to_os_string()],
            &Settings::default(),
        );
        assert_ne!(code, 0);
        // nothing was created next to the directory
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
