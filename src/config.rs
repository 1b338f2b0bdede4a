//! Runtime configuration.
//!
//! The data directory is resolved from, in order:
//! - the `--data-dir` flag
//! - `ROLODEX_DATA_DIR`
//! - the platform data directory (`<data>/rolodex/contacts`)
//!
//! Log filtering is left to `RUST_LOG`.

use std::path::PathBuf;

use crate::store::StoreError;

pub const DATA_DIR_ENV: &str = "ROLODEX_DATA_DIR";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "rolodex=info,rolodex_core=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one `<name>.json` bag per contact.
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve configuration from an optional flag value and the environment.
    pub fn resolve(data_dir_flag: Option<PathBuf>) -> Result<Self, StoreError> {
        let from_env = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self::resolve_with(data_dir_flag, from_env)
    }

    fn resolve_with(flag: Option<PathBuf>, env: Option<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = match flag.or(env).filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self { data_dir })
    }
}

pub fn default_data_dir() -> Result<PathBuf, StoreError> {
    let dirs =
        directories::ProjectDirs::from("", "", "rolodex").ok_or(StoreError::NoDataDir)?;
    Ok(dirs.data_dir().join("contacts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_env() {
        let config = Config::resolve_with(
            Some(PathBuf::from("/tmp/flag")),
            Some(PathBuf::from("/tmp/env")),
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/flag"));
    }

    #[test]
    fn test_env_used_without_flag() {
        let config = Config::resolve_with(None, Some(PathBuf::from("/tmp/env"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/env"));
    }

    #[test]
    fn test_empty_env_falls_back_to_default() {
        if let Ok(default) = default_data_dir() {
            let config = Config::resolve_with(None, Some(PathBuf::new())).unwrap();
            assert_eq!(config.data_dir, default);
            assert!(config.data_dir.ends_with("contacts"));
        }
    }
}
