//! Dependency declarations.
//!
//! A dependency either names a pod (optionally a subspec of it, optionally
//! with a version requirement) or embeds an ad hoc specification inline.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Specification;
use crate::consts::SUBSPEC_SEPARATOR;
use crate::version::Requirement;

/// A single entry in a target definition's or specification's dependency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DependencyRepr", into = "DependencyRepr")]
pub enum Dependency {
  /// Reference to a pod by hierarchical name (`"RestKit"`, `"RestKit/Network"`).
  Named {
    name: String,
    requirement: Option<Requirement>,
  },

  /// A specification supplied directly by the declarer.
  Inline(Arc<Specification>),
}

impl Dependency {
  /// Depend on a pod or subspec by name, accepting any version.
  pub fn named(name: impl Into<String>) -> Self {
    Dependency::Named {
      name: name.into(),
      requirement: None,
    }
  }

  /// Depend on a pod or subspec by name with a version requirement.
  pub fn with_requirement(name: impl Into<String>, requirement: Requirement) -> Self {
    Dependency::Named {
      name: name.into(),
      requirement: Some(requirement),
    }
  }

  /// Depend on an ad hoc specification.
  pub fn inline(spec: Specification) -> Self {
    Dependency::Inline(Arc::new(spec))
  }

  /// Full hierarchical name this dependency refers to.
  pub fn name(&self) -> &str {
    match self {
      Dependency::Named { name, .. } => name,
      Dependency::Inline(spec) => spec.name(),
    }
  }

  /// Name of the top-level pod (the first path segment).
  pub fn root_name(&self) -> &str {
    root_name(self.name())
  }

  /// The subspec path below the top-level pod, if any (`"ObjectMapping/XML"`).
  pub fn subspec_path(&self) -> Option<&str> {
    self
      .name()
      .split_once(SUBSPEC_SEPARATOR)
      .map(|(_, path)| path)
      .filter(|path| !path.is_empty())
  }

  /// Whether this dependency points below the top-level pod.
  pub fn is_subspec_dependency(&self) -> bool {
    self.subspec_path().is_some()
  }

  pub fn requirement(&self) -> Option<&Requirement> {
    match self {
      Dependency::Named { requirement, .. } => requirement.as_ref(),
      Dependency::Inline(_) => None,
    }
  }

  /// The embedded specification of an inline dependency.
  pub fn specification(&self) -> Option<&Arc<Specification>> {
    match self {
      Dependency::Named { .. } => None,
      Dependency::Inline(spec) => Some(spec),
    }
  }
}

/// First segment of a hierarchical pod name.
pub fn root_name(name: &str) -> &str {
  name.split(SUBSPEC_SEPARATOR).next().unwrap_or(name)
}

impl fmt::Display for Dependency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Dependency::Named {
        name,
        requirement: Some(req),
      } => write!(f, "{} ({})", name, req),
      Dependency::Named { name, requirement: None } => write!(f, "{}", name),
      Dependency::Inline(spec) => write!(f, "{} ({}, inline)", spec.name(), spec.version()),
    }
  }
}

/// Wire shape of a dependency.
///
/// Accepts a bare name string, `{ "name": ..., "requirement": ... }`, or
/// `{ "inline": <specification> }`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DependencyRepr {
  Name(String),
  Named {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requirement: Option<Requirement>,
  },
  Inline {
    inline: Specification,
  },
}

impl From<DependencyRepr> for Dependency {
  fn from(repr: DependencyRepr) -> Self {
    match repr {
      DependencyRepr::Name(name) => Dependency::named(name),
      DependencyRepr::Named { name, requirement } => Dependency::Named { name, requirement },
      DependencyRepr::Inline { inline } => Dependency::inline(inline),
    }
  }
}

impl From<Dependency> for DependencyRepr {
  fn from(dep: Dependency) -> Self {
    match dep {
      Dependency::Named { name, requirement: None } => DependencyRepr::Name(name),
      Dependency::Named { name, requirement } => DependencyRepr::Named { name, requirement },
      Dependency::Inline(spec) => DependencyRepr::Inline {
        inline: Arc::unwrap_or_clone(spec),
      },
    }
  }
}
