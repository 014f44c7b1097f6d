//! Per-user directory discovery.
//!
//! Follows the XDG base directory variables on Unix and the `APPDATA` family
//! on Windows. Nothing here touches the filesystem.

use crate::consts::APP_NAME;
use std::path::PathBuf;

fn env_path(var: &str) -> Option<PathBuf> {
  std::env::var(var).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  env_path("USERPROFILE").unwrap_or_else(|| PathBuf::from("C:\\"))
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  env_path("HOME").unwrap_or_else(|| PathBuf::from("/"))
}

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> PathBuf {
  env_path("APPDATA").unwrap_or_else(home_dir).join(APP_NAME)
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
  let config_home = env_path("XDG_CONFIG_HOME").unwrap_or_else(|| home_dir().join(".config"));
  config_home.join(APP_NAME)
}

/// Returns the directory for data files (spec repositories live here)
#[cfg(windows)]
pub fn data_dir() -> PathBuf {
  env_path("APPDATA").unwrap_or_else(home_dir).join(APP_NAME)
}

/// Returns the directory for data files (spec repositories live here)
#[cfg(not(windows))]
pub fn data_dir() -> PathBuf {
  let data_home = env_path("XDG_DATA_HOME").unwrap_or_else(|| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Returns the directory for cache files for the application
#[cfg(windows)]
pub fn cache_dir() -> PathBuf {
  env_path("LOCALAPPDATA")
    .unwrap_or_else(home_dir)
    .join(APP_NAME)
    .join("Cache")
}

/// Returns the directory for cache files for the application
#[cfg(not(windows))]
pub fn cache_dir() -> PathBuf {
  let cache_home = env_path("XDG_CACHE_HOME").unwrap_or_else(|| home_dir().join(".cache"));
  cache_home.join(APP_NAME)
}

/// Default location of the spec repositories
pub fn repos_dir() -> PathBuf {
  data_dir().join("repos")
}
