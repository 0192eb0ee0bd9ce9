//! Base error types for cuckoo
//!
//! Every variant that originates from a failed system call keeps the
//! underlying [`std::io::Error`] together with each path involved, so an
//! operator can finish or undo a half-done installation by hand.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when an error carries no OS error number.
pub const GENERIC_FAILURE: i32 = 1;

/// Exit code used for malformed invocations.
pub const USAGE_FAILURE: i32 = 2;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// The path, or the directory holding it, does not exist
    #[error("'{}' does not exist", path.display())]
    NotFound { path: PathBuf },

    /// The filesystem object is not a regular file, directory or symlink
    #[error("'{}' is not a regular file, directory or symbolic link", path.display())]
    UnsupportedType { path: PathBuf },

    /// Something other than a directory occupies a path that must be one
    #[error("'{}' exists, but is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// The process lacks execute permission on the target
    #[error("'{}' is not executable: {source}", path.display())]
    NotExecutable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory
    #[error("failed to create '{}': {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to list a directory
    #[error("failed to read directory '{}': {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the intercepted executable into its hook directory
    #[error("failed to move '{}' to '{}': {source}", from.display(), to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The executable was relocated, but the symlink replacing it could not be created
    #[error("unable to symlink '{}' to '{}': {source}", link.display(), target.display())]
    Symlink {
        link: PathBuf,
        target: PathBuf,
        relocated: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path of the running executable could not be determined
    #[error("unable to determine the path of the running executable: {source}")]
    SelfPath {
        #[source]
        source: std::io::Error,
    },

    /// A hook could not be started
    #[error("unable to launch '{}': {source}", path.display())]
    LaunchFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed invocation
    #[error("{0}")]
    Usage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The underlying OS error, if this error came from a system call
    pub fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            Error::NotExecutable { source, .. }
            | Error::DirectoryCreate { source, .. }
            | Error::DirectoryRead { source, .. }
            | Error::Relocate { source, .. }
            | Error::Symlink { source, .. }
            | Error::SelfPath { source }
            | Error::LaunchFailed { source, .. }
            | Error::Io(source) => Some(source),
            Error::NotFound { .. }
            | Error::UnsupportedType { .. }
            | Error::NotADirectory { .. }
            | Error::Usage(_) => None,
        }
    }

    /// Process exit code for this error
    ///
    /// Propagates the OS error number where there is one. `NotFound` and
    /// `NotADirectory` map to `ENOENT` and `ENOTDIR` so they read the same as
    /// the equivalent system call failure.
    ///
    /// `ENOENT` and clap's usage code are both 2, so a missing target and a
    /// malformed command line share an exit code. The message on stderr
    /// tells them apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => USAGE_FAILURE,
            Error::NotFound { .. } => 2,
            Error::NotADirectory { .. } => 20,
            _ => self
                .io_source()
                .and_then(std::io::Error::raw_os_error)
                .filter(|code| *code != 0)
                .unwrap_or(GENERIC_FAILURE),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::io;

    #[test]
    fn test_relocate_error_names_both_paths() {
        let error = Error::Relocate {
            from: PathBuf::from("/usr/bin/foobar"),
            to: PathBuf::from("/usr/bin/.foobar.d/50-foobar"),
            source: io::Error::from_raw_os_error(18),
        };

        let msg = error.to_string();
        assert!(msg.contains("/usr/bin/foobar"));
        assert!(msg.contains("/usr/bin/.foobar.d/50-foobar"));
        assert_eq!(error.exit_code(), 18);
    }

    #[test]
    fn test_symlink_error_names_both_paths() {
        let error = Error::Symlink {
            link: PathBuf::from("/usr/bin/foobar"),
            target: PathBuf::from("/usr/local/bin/cuckoo"),
            relocated: PathBuf::from("/usr/bin/.foobar.d/50-foobar"),
            source: io::Error::from_raw_os_error(13),
        };

        let msg = error.to_string();
        assert!(msg.contains("unable to symlink"));
        assert!(msg.contains("/usr/local/bin/cuckoo"));
        assert_eq!(error.exit_code(), 13);
    }

    #[test]
    fn test_exit_code_without_os_error() {
        let error = Error::Io(io::Error::other("synthetic"));
        assert_eq!(error.exit_code(), GENERIC_FAILURE);

        let error = Error::UnsupportedType {
            path: PathBuf::from("/dev/null"),
        };
        assert_eq!(error.exit_code(), GENERIC_FAILURE);
    }

    #[test]
    fn test_exit_code_for_structural_errors() {
        let not_found = Error::NotFound {
            path: PathBuf::from("/missing"),
        };
        assert_eq!(not_found.exit_code(), 2);

        let not_dir = Error::NotADirectory {
            path: PathBuf::from("/usr/bin/.foobar.d"),
        };
        assert_eq!(not_dir.exit_code(), 20);
        assert!(not_dir.to_string().contains("not a directory"));

        assert_eq!(Error::Usage("bad".into()).exit_code(), USAGE_FAILURE);
    }

    #[test]
    fn test_io_error_conversion() {
        let error: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(error.to_string().contains("IO error"));
        assert!(error.io_source().is_some());
    }
}
