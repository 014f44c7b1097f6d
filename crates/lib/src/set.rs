//! Specification sets.
//!
//! A [`SpecificationSet`] is the name-addressed view over every known version
//! of one pod. Its single essential operation picks the specification that
//! satisfies a requirement. The resolver caches sets by top-level pod name,
//! and tests can seed that cache with their own implementations.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::specification::Specification;
use crate::version::{Requirement, Version};

/// Errors returned by [`SpecificationSet::specification_for`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
  /// Versions exist but none satisfies the requirement.
  #[error("no version of '{name}' satisfies '{}' (available: {})", requirement_label(.requirement), version_list(.available))]
  NoMatchingVersion {
    name: String,
    requirement: Option<Requirement>,
    available: Vec<Version>,
  },

  /// The set was constructed without any version.
  #[error("no versions of '{name}' are available")]
  Empty { name: String },
}

pub(crate) fn requirement_label(requirement: &Option<Requirement>) -> String {
  requirement.as_ref().map_or_else(|| "any version".to_string(), |r| r.to_string())
}

pub(crate) fn version_list(versions: &[Version]) -> String {
  if versions.is_empty() {
    return "none".to_string();
  }
  versions.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

/// All known versions of one pod.
pub trait SpecificationSet: fmt::Debug + Send + Sync {
  /// Top-level pod name this set answers for.
  fn name(&self) -> &str;

  /// Every available version, newest first.
  fn versions(&self) -> Vec<Version>;

  /// Pick the specification satisfying `requirement`.
  ///
  /// Calling this twice with the same argument must return equal
  /// specifications.
  fn specification_for(&self, requirement: Option<&Requirement>) -> Result<Arc<Specification>, SetError>;
}

/// A set backed by specifications read from a source.
///
/// Picks the newest version satisfying the requirement. Without a
/// requirement, the newest release wins; pre-releases are only chosen when
/// nothing else exists.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSet {
  name: String,
  /// Sorted newest first.
  specs: Vec<Arc<Specification>>,
}

impl SourceSet {
  pub fn new(name: impl Into<String>, specs: impl IntoIterator<Item = Arc<Specification>>) -> Self {
    let mut specs: Vec<_> = specs.into_iter().collect();
    specs.sort_by(|a, b| b.version().cmp(a.version()));
    specs.dedup_by(|a, b| a.version() == b.version());
    Self {
      name: name.into(),
      specs,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.specs.is_empty()
  }
}

impl SpecificationSet for SourceSet {
  fn name(&self) -> &str {
    &self.name
  }

  fn versions(&self) -> Vec<Version> {
    self.specs.iter().map(|s| s.version().clone()).collect()
  }

  fn specification_for(&self, requirement: Option<&Requirement>) -> Result<Arc<Specification>, SetError> {
    if self.specs.is_empty() {
      return Err(SetError::Empty {
        name: self.name.clone(),
      });
    }

    let chosen = match requirement {
      Some(req) => self.specs.iter().find(|s| req.matches(s.version())),
      None => self
        .specs
        .iter()
        .find(|s| !s.version().is_prerelease())
        .or_else(|| self.specs.first()),
    };

    match chosen {
      Some(spec) => {
        trace!(name = %self.name, version = %spec.version(), "selected specification");
        Ok(Arc::clone(spec))
      }
      None => Err(SetError::NoMatchingVersion {
        name: self.name.clone(),
        requirement: requirement.cloned(),
        available: self.versions(),
      }),
    }
  }
}

/// A set wrapping a single specification declared inline in a dependency.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalSet {
  spec: Arc<Specification>,
}

impl ExternalSet {
  pub fn new(spec: Arc<Specification>) -> Self {
    Self { spec }
  }

  pub fn specification(&self) -> &Arc<Specification> {
    &self.spec
  }
}

impl SpecificationSet for ExternalSet {
  fn name(&self) -> &str {
    self.spec.root_name()
  }

  fn versions(&self) -> Vec<Version> {
    vec![self.spec.version().clone()]
  }

  fn specification_for(&self, requirement: Option<&Requirement>) -> Result<Arc<Specification>, SetError> {
    match requirement {
      Some(req) if !req.matches(self.spec.version()) => Err(SetError::NoMatchingVersion {
        name: self.name().to_string(),
        requirement: Some(req.clone()),
        available: self.versions(),
      }),
      _ => Ok(Arc::clone(&self.spec)),
    }
  }
}
