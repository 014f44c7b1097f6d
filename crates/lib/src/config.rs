//! Configuration loading.
//!
//! Precedence, highest first: environment variables, the optional
//! `<config_dir>/config.json` file, built-in defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::platform::paths::{config_dir, repos_dir};

/// Overrides the spec repositories directory.
pub const REPOS_DIR_ENV: &str = "PODRES_REPOS_DIR";

/// Overrides the sandbox root.
pub const SANDBOX_ENV: &str = "PODRES_SANDBOX";

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_SANDBOX: &str = "Pods";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Effective configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Directory whose subdirectories are spec repositories.
  pub repos_dir: PathBuf,
  /// Root of the installation sandbox.
  pub sandbox_root: PathBuf,
}

/// Contents of `config.json`. Every field is optional.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
  repos_dir: Option<PathBuf>,
  sandbox_root: Option<PathBuf>,
}

impl Config {
  /// Path of the configuration file.
  pub fn file_path() -> PathBuf {
    config_dir().join(CONFIG_FILENAME)
  }

  /// Load configuration from the environment, the config file and defaults.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&Self::file_path())
  }

  /// Like [`Self::load`] with an explicit config file location.
  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    let file = read_config_file(path)?;

    let repos_dir = env_path(REPOS_DIR_ENV)
      .or(file.repos_dir)
      .unwrap_or_else(repos_dir);
    let sandbox_root = env_path(SANDBOX_ENV)
      .or(file.sandbox_root)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_SANDBOX));

    let config = Config {
      repos_dir,
      sandbox_root,
    };
    debug!(repos_dir = %config.repos_dir.display(), sandbox = %config.sandbox_root.display(), "loaded config");
    Ok(config)
  }
}

fn env_path(var: &str) -> Option<PathBuf> {
  std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
    Err(source) => {
      return Err(ConfigError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })
}
