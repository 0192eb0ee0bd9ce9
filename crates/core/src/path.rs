//! Canonical path resolution
//!
//! [`ResolvedPath::resolve`] turns a path that may be relative, or may run
//! through symbolic links, into an absolute directory plus a base name.
//!
//! The name of a symbolic link is taken from the literal path, never from
//! what the link points at. This is what lets `/usr/bin/foobar -> cuckoo`
//! still be recognised as `foobar` once resolved.
//!
//! # Examples
//!
//! ```
//! use cuckoo_core::ResolvedPath;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = ResolvedPath::resolve("/")?;
//! assert_eq!(root.name(), "");
//! assert_eq!(root.directory(), std::path::Path::new("/"));
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An absolute path split into its canonical directory and base name
///
/// Invariant: `absolute == directory.join(name)`, except for directories,
/// where `name` is empty and `absolute == directory`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath {
    absolute: PathBuf,
    directory: PathBuf,
    name: String,
}

impl ResolvedPath {
    /// Resolve `path` against the filesystem
    ///
    /// - symbolic link: the parent directory is canonicalised, the name is kept
    /// - regular file: fully canonicalised, then split
    /// - directory: fully canonicalised, name is empty
    ///
    /// # Errors
    ///
    /// `NotFound` when the path or its directory does not exist,
    /// `UnsupportedType` for sockets, fifos, devices and the like.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::symlink_metadata(path).map_err(|e| not_found_or(path, e))?;
        let file_type = metadata.file_type();

        if file_type.is_symlink() {
            if let Some(name) = path.file_name() {
                let parent = parent_or_cwd(path);
                let directory = fs::canonicalize(parent).map_err(|e| not_found_or(parent, e))?;
                return Ok(Self::from_parts(directory, name));
            }
            // "link/.." style paths have no literal name: resolve through the link
            return Self::canonical(path);
        }

        if file_type.is_dir() || file_type.is_file() {
            return Self::canonical(path);
        }

        Err(Error::UnsupportedType {
            path: path.to_path_buf(),
        })
    }

    fn canonical(path: &Path) -> Result<Self> {
        let absolute = fs::canonicalize(path).map_err(|e| not_found_or(path, e))?;

        if absolute.is_dir() {
            return Ok(Self {
                directory: absolute.clone(),
                absolute,
                name: String::new(),
            });
        }

        match (absolute.parent(), absolute.file_name()) {
            (Some(parent), Some(name)) => Ok(Self::from_parts(parent.to_path_buf(), name)),
            _ => Err(Error::UnsupportedType { path: absolute }),
        }
    }

    fn from_parts(directory: PathBuf, name: &OsStr) -> Self {
        Self {
            absolute: directory.join(name),
            directory,
            name: name.to_string_lossy().into_owned(),
        }
    }

    /// The absolute path
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// The canonical directory containing the object
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The base name (empty for directories)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consume and return the absolute path
    pub fn into_path_buf(self) -> PathBuf {
        self.absolute
    }
}

impl std::fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.absolute.display())
    }
}

/// Parent of `path`, with a bare name meaning the current directory
fn parent_or_cwd(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn not_found_or(path: &Path, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        Error::Io(err)
    }
}
