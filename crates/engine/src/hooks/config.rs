//! Hook data structures

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Which directory a hook was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookSource {
    /// `<dir>/.<name>.d`
    PerTarget,
    /// `<common-root>/<name>`
    Common,
}

/// A discovered executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEntry {
    path: PathBuf,
    sort_key: OsString,
    source: HookSource,
}

impl HookEntry {
    /// Create an entry; the sort key is the file name of `path`
    pub fn new(path: PathBuf, source: HookSource) -> Self {
        let sort_key = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
        Self {
            path,
            sort_key,
            source,
        }
    }

    /// Full path to the executable
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name used for ordering
    pub fn sort_key(&self) -> &OsStr {
        &self.sort_key
    }

    /// Directory the hook came from
    pub fn source(&self) -> HookSource {
        self.source
    }
}

/// Hooks in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookSequence(Vec<HookEntry>);

impl HookSequence {
    /// Number of hooks
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no hooks were found
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in execution order
    pub fn iter(&self) -> std::slice::Iter<'_, HookEntry> {
        self.0.iter()
    }
}

impl From<Vec<HookEntry>> for HookSequence {
    fn from(entries: Vec<HookEntry>) -> Self {
        Self(entries)
    }
}

impl IntoIterator for HookSequence {
    type Item = HookEntry;
    type IntoIter = std::vec::IntoIter<HookEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a HookSequence {
    type Item = &'a HookEntry;
    type IntoIter = std::slice::Iter<'a, HookEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
