//! Runtime settings
//!
//! cuckoo has no configuration file: hooks are configured by dropping
//! executables into directories. The few knobs that exist are read from the
//! environment once, at start of process.

use std::ffi::OsString;
use std::path::PathBuf;

/// Overrides the root of the common hook directories
pub const COMMON_ROOT_ENV: &str = "CUCKOO_COMMON_ROOT";

/// Log filter directive (`RUST_LOG` syntax)
pub const LOG_FILTER_ENV: &str = "CUCKOO_LOG";

/// Append logs to this file in addition to stderr
pub const LOG_FILE_ENV: &str = "CUCKOO_LOG_FILE";

/// Default root of the common hook directories
pub const DEFAULT_COMMON_ROOT: &str = "/etc/cuckoo";

/// Settings resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of the common hook directories; hooks for `foobar` live in `<root>/foobar`
    pub common_root: PathBuf,

    /// Explicit log filter, overriding the mode's default level
    pub log_filter: Option<String>,

    /// Optional log file
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            common_root: PathBuf::from(DEFAULT_COMMON_ROOT),
            log_filter: None,
            log_file: None,
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Read settings through `lookup`, treating empty values as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let defaults = Self::default();

        Self {
            common_root: get(COMMON_ROOT_ENV).map_or(defaults.common_root, PathBuf::from),
            log_filter: get(LOG_FILTER_ENV).map(|v| v.to_string_lossy().into_owned()),
            log_file: get(LOG_FILE_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup_from(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.common_root, PathBuf::from("/etc/cuckoo"));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            (COMMON_ROOT_ENV, "/opt/hooks"),
            (LOG_FILTER_ENV, "debug"),
            (LOG_FILE_ENV, "/var/log/cuckoo.log"),
        ]));

        assert_eq!(settings.common_root, PathBuf::from("/opt/hooks"));
        assert_eq!(settings.log_filter.as_deref(), Some("debug"));
        assert_eq!(settings.log_file, Some(PathBuf::from("/var/log/cuckoo.log")));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let settings = Settings::from_lookup(lookup_from(&[
            (COMMON_ROOT_ENV, ""),
            (LOG_FILE_ENV, ""),
        ]));

        assert_eq!(settings, Settings::default());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        temp_env::with_vars(
            [
                (COMMON_ROOT_ENV, Some("/srv/cuckoo")),
                (LOG_FILTER_ENV, None),
                (LOG_FILE_ENV, None),
            ],
            || {
                let settings = Settings::from_env();
                assert_eq!(settings.common_root, PathBuf::from("/srv/cuckoo"));
                assert!(settings.log_filter.is_none());
            },
        );
    }
}
