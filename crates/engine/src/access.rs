//! Execute-permission checks
//!
//! Asks the kernel (`access(2)` with `X_OK`) rather than inspecting mode
//! bits, so owner, group and ACL rules are all honoured.

use rustix::fs::{Access, access};
use std::io;
use std::path::Path;

/// Check that the current process may execute `path`
pub fn check_executable(path: &Path) -> io::Result<()> {
    access(path, Access::EXEC_OK).map_err(io::Error::from)
}

/// `true` if the current process may execute `path`
pub fn is_executable(path: &Path) -> bool {
    check_executable(path).is_ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn test_executable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hook");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(is_executable(&path));
    }

    #[test]
    fn test_plain_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(!is_executable(&path));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = check_executable(&temp.path().join("missing")).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
