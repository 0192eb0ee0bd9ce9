//! Hook discovery
//!
//! Scans the per-target and common hook directories one level deep and
//! merges every executable file into a single sequence ordered by file name.

use super::config::{HookEntry, HookSequence, HookSource};
use crate::access::is_executable;
use cuckoo_core::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discover hooks for one intercepted executable
pub struct HookLoader {
    per_target_dir: PathBuf,
    common_dir: PathBuf,
}

impl HookLoader {
    /// Create a loader over the per-target and common hook directories
    #[must_use]
    pub fn new(per_target_dir: impl Into<PathBuf>, common_dir: impl Into<PathBuf>) -> Self {
        Self {
            per_target_dir: per_target_dir.into(),
            common_dir: common_dir.into(),
        }
    }

    /// Collect and order all hooks
    ///
    /// Missing directories contribute nothing. Entries are sorted by file
    /// name; on equal names the per-target entry comes first.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory exists but cannot be listed.
    pub fn load(&self) -> Result<HookSequence> {
        let mut entries = Vec::new();

        scan_dir(&self.per_target_dir, HookSource::PerTarget, &mut entries)?;
        if self.same_directory() {
            tracing::debug!(
                "Common hook directory is the per-target directory: {}",
                self.common_dir.display()
            );
        } else {
            scan_dir(&self.common_dir, HookSource::Common, &mut entries)?;
        }

        // stable: keeps per-target ahead of common on equal names
        entries.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));

        tracing::debug!(hook_count = entries.len(), "Discovered hooks");
        Ok(HookSequence::from(entries))
    }

    /// `true` when both paths lead to the same directory
    fn same_directory(&self) -> bool {
        match (
            fs::canonicalize(&self.per_target_dir),
            fs::canonicalize(&self.common_dir),
        ) {
            (Ok(per_target), Ok(common)) => per_target == common,
            _ => false,
        }
    }
}

/// Append the executable files directly inside `dir` to `entries`
fn scan_dir(dir: &Path, source: HookSource, entries: &mut Vec<HookEntry>) -> Result<()> {
    match fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            tracing::warn!("Ignoring hook path that is not a directory: {}", dir.display());
            return Ok(());
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Hook directory does not exist: {}", dir.display());
            return Ok(());
        }
        Err(e) => {
            return Err(Error::DirectoryRead {
                path: dir.to_path_buf(),
                source: e,
            });
        }
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("failed to list directory"));
                return Err(Error::DirectoryRead {
                    path: dir.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                // dangling symlinks and entries that vanished mid-scan
                tracing::warn!("Skipping unreadable hook entry: {e}");
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() {
            tracing::debug!("Skipping non-file entry: {}", path.display());
            continue;
        }

        if !is_executable(path) {
            tracing::debug!("Skipping non-executable file: {}", path.display());
            continue;
        }

        tracing::debug!(source = ?source, "Found hook: {}", path.display());
        entries.push(HookEntry::new(path.to_path_buf(), source));
    }

    Ok(())
}
