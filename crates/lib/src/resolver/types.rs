//! Resolution results.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::platform::Platform;
use crate::specification::Specification;

/// What asked for a dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
  /// A podfile target definition, by name.
  Target(String),
  /// A specification node, by full name.
  Specification(String),
}

impl fmt::Display for Requester {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Requester::Target(name) => write!(f, "target '{}'", name),
      Requester::Specification(name) => write!(f, "'{}'", name),
    }
  }
}

/// The specifications one target definition needs, in the order they were
/// accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
  pub name: String,
  pub platform: Platform,
  pub specs: Vec<Arc<Specification>>,
}

impl ResolvedTarget {
  /// Full names of the resolved specifications.
  pub fn spec_names(&self) -> Vec<&str> {
    self.specs.iter().map(|s| s.name()).collect()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.specs.iter().any(|s| s.name() == name)
  }
}

/// Outcome of resolving a whole podfile, one entry per target definition in
/// podfile order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
  targets: Vec<ResolvedTarget>,
}

impl Resolution {
  pub(crate) fn push(&mut self, target: ResolvedTarget) {
    self.targets.push(target);
  }

  pub fn get(&self, target: &str) -> Option<&ResolvedTarget> {
    self.targets.iter().find(|t| t.name == target)
  }

  pub fn iter(&self) -> impl Iterator<Item = &ResolvedTarget> {
    self.targets.iter()
  }

  /// Every resolved specification across all targets.
  pub fn specs(&self) -> impl Iterator<Item = &Arc<Specification>> {
    self.targets.iter().flat_map(|t| t.specs.iter())
  }

  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }

  /// Target name to specification list.
  pub fn into_map(self) -> BTreeMap<String, Vec<Arc<Specification>>> {
    self.targets.into_iter().map(|t| (t.name, t.specs)).collect()
  }
}

impl IntoIterator for Resolution {
  type Item = ResolvedTarget;
  type IntoIter = std::vec::IntoIter<ResolvedTarget>;

  fn into_iter(self) -> Self::IntoIter {
    self.targets.into_iter()
  }
}
