//! Path utilities for lifelog data files.
//!
//! Provides centralized path resolution for all lifelog-related files:
//!
//! - [`lifelog_dir`] - `~/.lifelog/` (base directory for all lifelog data)
//! - [`store_path`] - `~/.lifelog/store.redb` (local persistence database)
//! - [`config_path`] - `~/.lifelog/lifelog.toml` (configuration file)

use crate::constants::HOME_ENV_VAR;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the lifelog base directory.
///
/// Resolution order:
/// 1. `LIFELOG_HOME` environment variable (if set)
/// 2. `~/.lifelog/` (default)
///
/// CI and tests can relocate all state by setting `LIFELOG_HOME`.
pub fn lifelog_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV_VAR)
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }

    let home = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home.join(".lifelog"))
}

/// Get the local store database path: `~/.lifelog/store.redb`
pub fn store_path() -> Result<PathBuf> {
    Ok(lifelog_dir()?.join("store.redb"))
}

/// Get the configuration file path: `~/.lifelog/lifelog.toml`
///
/// A `lifelog.toml` in the current directory takes precedence, so a project
/// checkout can carry its own remote coordinates.
pub fn config_path() -> Result<PathBuf> {
    let local = PathBuf::from("lifelog.toml");
    if local.exists() {
        return Ok(local);
    }
    Ok(lifelog_dir()?.join("lifelog.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_home_env_override() {
        unsafe { std::env::set_var(HOME_ENV_VAR, "/tmp/lifelog-test") };
        assert_eq!(lifelog_dir().unwrap(), PathBuf::from("/tmp/lifelog-test"));
        assert_eq!(
            store_path().unwrap(),
            PathBuf::from("/tmp/lifelog-test/store.redb")
        );
        unsafe { std::env::remove_var(HOME_ENV_VAR) };
    }

    #[test]
    #[serial]
    fn test_default_under_home() {
        unsafe { std::env::remove_var(HOME_ENV_VAR) };
        let dir = lifelog_dir().unwrap();
        assert!(dir.ends_with(".lifelog"));
    }
}
