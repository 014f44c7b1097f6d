//! Podfile input types.
//!
//! A [`Podfile`] is a list of [`TargetDefinition`]s. Each target requires one
//! platform and declares an ordered list of dependencies. The resolver never
//! parses manifest syntax; [`Podfile::load`] reads the JSON form used by the
//! command line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::platform::Platform;
use crate::specification::Dependency;

/// Errors that can occur while loading a podfile.
#[derive(Debug, Error)]
pub enum PodfileError {
  #[error("failed to read podfile {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse podfile {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("target '{0}' is defined more than once")]
  DuplicateTarget(String),
}

/// A named group of dependencies sharing one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDefinition {
  pub name: String,
  pub platform: Platform,
  #[serde(default)]
  pub dependencies: Vec<Dependency>,
}

impl TargetDefinition {
  pub fn new(name: impl Into<String>, platform: Platform) -> Self {
    Self {
      name: name.into(),
      platform,
      dependencies: Vec::new(),
    }
  }

  pub fn with_dependency(mut self, dependency: Dependency) -> Self {
    self.dependencies.push(dependency);
    self
  }

  pub fn set_platform(&mut self, platform: Platform) {
    self.platform = platform;
  }
}

/// A parsed dependency manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Podfile {
  #[serde(default)]
  pub targets: Vec<TargetDefinition>,
}

impl Podfile {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a target definition.
  pub fn with_target(mut self, target: TargetDefinition) -> Self {
    self.targets.push(target);
    self
  }

  pub fn target(&self, name: &str) -> Option<&TargetDefinition> {
    self.targets.iter().find(|t| t.name == name)
  }

  pub fn target_mut(&mut self, name: &str) -> Option<&mut TargetDefinition> {
    self.targets.iter_mut().find(|t| t.name == name)
  }

  /// Load a podfile from its JSON form.
  pub fn load(path: &Path) -> Result<Self, PodfileError> {
    let content = fs::read_to_string(path).map_err(|source| PodfileError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let podfile = Self::from_json(&content).map_err(|e| match e {
      PodfileError::Parse { source, .. } => PodfileError::Parse {
        path: path.to_path_buf(),
        source,
      },
      other => other,
    })?;
    debug!(path = %path.display(), targets = podfile.targets.len(), "loaded podfile");
    Ok(podfile)
  }

  /// Parse a podfile from a JSON string.
  pub fn from_json(content: &str) -> Result<Self, PodfileError> {
    let podfile: Podfile = serde_json::from_str(content).map_err(|source| PodfileError::Parse {
      path: PathBuf::new(),
      source,
    })?;
    podfile.validate()?;
    Ok(podfile)
  }

  fn validate(&self) -> Result<(), PodfileError> {
    for (i, target) in self.targets.iter().enumerate() {
      if self.targets[..i].iter().any(|t| t.name == target.name) {
        return Err(PodfileError::DuplicateTarget(target.name.clone()));
      }
    }
    Ok(())
  }
}

/// Directory that will hold installed pod sources.
///
/// The resolver carries it for later installation steps but never touches
/// the file system through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
  root: PathBuf,
}

impl Sandbox {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Where the sources of `name` would be installed.
  pub fn pod_dir(&self, name: &str) -> PathBuf {
    self.root.join(crate::specification::root_name(name))
  }
}
