//! Interception installer
//!
//! Moves a target executable into its hook directory and puts a symlink to
//! the running cuckoo binary in its place:
//!
//! ```text
//! /usr/bin/foobar              ->  /usr/bin/.foobar.d/50-foobar
//! /usr/bin/foobar (symlink)    ->  /usr/local/bin/cuckoo
//! ```
//!
//! The rename is the only mutation before the symlink is created, so a
//! failure up to and including the rename leaves the target where it was.
//! A failed symlink after a successful rename is reported as
//! [`Error::Symlink`] and must be finished by hand.

use crate::access::check_executable;
use cuckoo_core::{Error, ResolvedPath, Result, TargetLayout};
use std::fs;
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

/// Permissions for a newly created hook directory (rwxrwx---)
const HOOK_DIR_MODE: u32 = 0o770;

/// Result of a completed installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// The cuckoo binary the new symlink points at
    pub self_path: PathBuf,
    /// The intercepted path, now a symlink
    pub target: PathBuf,
    /// The per-target hook directory
    pub hook_dir: PathBuf,
    /// Where the original executable now lives
    pub relocated: PathBuf,
}

/// What `install` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The target was relocated and replaced by a symlink
    Installed(InstallReport),
    /// The target was already a symlink; nothing was changed
    AlreadyInstalled {
        /// The symlink
        target: PathBuf,
        /// What it points at, if readable
        points_to: Option<PathBuf>,
    },
}

/// Installs cuckoo in front of executables
#[derive(Debug, Clone)]
pub struct Installer {
    self_path: PathBuf,
}

impl Installer {
    /// Create an installer whose symlinks point at `self_path`
    pub fn new(self_path: impl Into<PathBuf>) -> Self {
        Self {
            self_path: self_path.into(),
        }
    }

    /// Create an installer for the currently running executable
    pub fn for_current_exe() -> Result<Self> {
        let exe = std::env::current_exe().map_err(|source| Error::SelfPath { source })?;
        // current_exe may be relative or contain links on some platforms
        let exe = fs::canonicalize(&exe).map_err(|source| Error::SelfPath { source })?;
        Ok(Self::new(exe))
    }

    /// The path new symlinks point at
    pub fn self_path(&self) -> &Path {
        &self.self_path
    }

    /// Intercept `target`
    ///
    /// Idempotent: a target that is already a symlink is left alone.
    #[tracing::instrument(skip(self), fields(target = %target.display()))]
    pub fn install(&self, target: &Path) -> Result<InstallOutcome> {
        let metadata = fs::symlink_metadata(target).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound {
                path: target.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;

        if metadata.file_type().is_symlink() {
            let points_to = fs::read_link(target).ok();
            tracing::info!(
                points_to = ?points_to,
                "Target is already a symbolic link, nothing to do"
            );
            return Ok(InstallOutcome::AlreadyInstalled {
                target: target.to_path_buf(),
                points_to,
            });
        }

        let resolved = ResolvedPath::resolve(target)?;
        if resolved.name().is_empty() || !resolved.absolute().is_file() {
            return Err(Error::UnsupportedType {
                path: resolved.into_path_buf(),
            });
        }

        check_executable(resolved.absolute()).map_err(|source| Error::NotExecutable {
            path: resolved.absolute().to_path_buf(),
            source,
        })?;

        if self.is_self(resolved.absolute()) {
            return Err(Error::Usage(format!(
                "refusing to intercept the cuckoo binary itself ({})",
                resolved.absolute().display()
            )));
        }

        let layout = TargetLayout::new(&resolved);
        ensure_dir(layout.hook_dir())?;

        let relocated = layout.relocated();
        if fs::symlink_metadata(&relocated).is_ok() {
            return Err(Error::Relocate {
                from: layout.target().to_path_buf(),
                to: relocated,
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "a previously relocated executable is in the way",
                ),
            });
        }

        fs::rename(layout.target(), &relocated).map_err(|source| Error::Relocate {
            from: layout.target().to_path_buf(),
            to: relocated.clone(),
            source,
        })?;
        tracing::debug!("Moved {} to {}", layout.target().display(), relocated.display());

        std::os::unix::fs::symlink(&self.self_path, layout.target()).map_err(|source| {
            Error::Symlink {
                link: layout.target().to_path_buf(),
                target: self.self_path.clone(),
                relocated: relocated.clone(),
                source,
            }
        })?;
        tracing::debug!(
            "Linked {} to {}",
            layout.target().display(),
            self.self_path.display()
        );

        Ok(InstallOutcome::Installed(InstallReport {
            self_path: self.self_path.clone(),
            target: layout.target().to_path_buf(),
            hook_dir: layout.hook_dir().to_path_buf(),
            relocated,
        }))
    }

    fn is_self(&self, path: &Path) -> bool {
        match (fs::canonicalize(&self.self_path), fs::canonicalize(path)) {
            (Ok(me), Ok(other)) => me == other,
            _ => false,
        }
    }
}

/// Make sure `dir` exists and is a directory, creating missing parents
fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Creating hook directory {}", dir.display());
            fs::DirBuilder::new()
                .recursive(true)
                .mode(HOOK_DIR_MODE)
                .create(dir)
                .map_err(|source| Error::DirectoryCreate {
                    path: dir.to_path_buf(),
                    source,
                })
        }
        Err(source) => Err(Error::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        }),
    }
}
