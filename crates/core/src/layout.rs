//! On-disk layout of an intercepted executable
//!
//! For a target `<dir>/<name>`:
//!
//! ```text
//! <dir>/<name>                 symlink to the cuckoo binary
//! <dir>/.<name>.d/             per-target hook directory
//! <dir>/.<name>.d/50-<name>    the relocated original executable
//! <common-root>/<name>/        common hook directory (provisioned externally)
//! ```

use crate::path::ResolvedPath;
use std::path::{Path, PathBuf};

/// File name that selects install mode when the binary is invoked under it
pub const INSTALLER_NAME: &str = "cuckoo";

/// Prefix given to the relocated original executable
///
/// Sits mid-pack so user hooks can be named to run before (`10-`) or after (`90-`) it.
pub const RELOCATION_PREFIX: &str = "50-";

/// Hook locations derived from a resolved target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
    target: PathBuf,
    name: String,
    hook_dir: PathBuf,
}

impl TargetLayout {
    /// Derive the layout for `target`
    pub fn new(target: &ResolvedPath) -> Self {
        let name = target.name();
        Self {
            target: target.absolute().to_path_buf(),
            name: name.to_string(),
            hook_dir: target.directory().join(hook_dir_name(name)),
        }
    }

    /// The intercepted path (`<dir>/<name>`)
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// The target's base name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The per-target hook directory (`<dir>/.<name>.d`)
    pub fn hook_dir(&self) -> &Path {
        &self.hook_dir
    }

    /// The common hook directory (`<common_root>/<name>`)
    pub fn common_dir(&self, common_root: &Path) -> PathBuf {
        common_root.join(&self.name)
    }

    /// Where the original executable is moved to (`<dir>/.<name>.d/50-<name>`)
    pub fn relocated(&self) -> PathBuf {
        self.hook_dir.join(relocated_name(&self.name))
    }
}

/// `.<name>.d`
pub fn hook_dir_name(name: &str) -> String {
    format!(".{name}.d")
}

/// `50-<name>`
pub fn relocated_name(name: &str) -> String {
    format!("{RELOCATION_PREFIX}{name}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hook_dir_name() {
        assert_eq!(hook_dir_name("foobar"), ".foobar.d");
    }

    #[test]
    fn test_relocated_name_sorts_mid_pack() {
        let relocated = relocated_name("foobar");
        assert_eq!(relocated, "50-foobar");
        assert!("10-pre" < relocated.as_str());
        assert!(relocated.as_str() < "90-post");
    }

    #[test]
    fn test_layout_for_target() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("foobar"), "x").unwrap();
        let target = ResolvedPath::resolve(temp.path().join("foobar")).unwrap();

        let layout = TargetLayout::new(&target);
        let dir = fs::canonicalize(temp.path()).unwrap();

        assert_eq!(layout.name(), "foobar");
        assert_eq!(layout.target(), dir.join("foobar"));
        assert_eq!(layout.hook_dir(), dir.join(".foobar.d"));
        assert_eq!(layout.relocated(), dir.join(".foobar.d/50-foobar"));
        assert_eq!(
            layout.common_dir(Path::new("/etc/cuckoo")),
            Path::new("/etc/cuckoo/foobar")
        );
    }
}
