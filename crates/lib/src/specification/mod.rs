//! The specification tree.
//!
//! A [`Specification`] describes one version of a pod: the platforms it
//! supports, its own dependencies, and a tree of nested subspecs. Subspecs are
//! full specifications owned by their parent; their effective name is the
//! parent's name plus `/` plus their own short name.
//!
//! # Default Subspecs
//!
//! A node with children implicitly depends on its default subspecs: the
//! declared main subspec if there is one, otherwise every direct child. See
//! [`Specification::all_dependencies`].
//!
//! # Platform Inheritance
//!
//! A subspec supports at most what its ancestors support. Platforms a
//! subspec declares are intersected with its parent's effective platforms,
//! keeping the stricter deployment target.

mod dependency;

pub use dependency::{Dependency, root_name};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::SUBSPEC_SEPARATOR;
use crate::platform::{self, Platform};
use crate::version::Version;

/// Errors raised by the specification tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecificationError {
  /// A hierarchical path does not lead to a subspec.
  #[error("subspec '{name}' not found in specification '{root}'")]
  SubspecNotFound { name: String, root: String },

  /// The declared main subspec is not among the children.
  #[error("specification '{spec}' declares main subspec '{main_subspec}' which does not exist")]
  MissingMainSubspec { spec: String, main_subspec: String },

  /// A top-level specification was declared without a version.
  #[error("specification '{name}' has no version")]
  MissingVersion { name: String },

  /// A name was empty or contained the subspec separator.
  #[error("invalid specification name '{name}': {reason}")]
  InvalidName { name: String, reason: String },
}

impl SpecificationError {
  /// Whether this error reflects a malformed tree rather than a bad lookup.
  pub fn is_internal(&self) -> bool {
    !matches!(self, SpecificationError::SubspecNotFound { .. })
  }
}

/// Metadata for one pod version, or one subspec inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpecification", into = "RawSpecification")]
pub struct Specification {
  /// Full hierarchical name (`"RestKit/ObjectMapping/XML"`).
  name: String,
  /// Own segment of the name (`"XML"`); equals `name` for a top-level spec.
  base_name: String,
  version: Version,
  /// Platforms as declared. Empty means every known platform.
  platforms: Vec<Platform>,
  /// Effective platforms of the parent; `None` for a top-level spec.
  inherited_platforms: Option<Vec<Platform>>,
  dependencies: Vec<Dependency>,
  subspecs: Vec<Specification>,
  main_subspec: Option<String>,
}

impl Specification {
  /// Create a top-level specification with no platforms, dependencies or subspecs.
  pub fn new(name: impl Into<String>, version: Version) -> Self {
    let name = name.into();
    Self {
      base_name: name.clone(),
      name,
      version,
      platforms: Vec::new(),
      inherited_platforms: None,
      dependencies: Vec::new(),
      subspecs: Vec::new(),
      main_subspec: None,
    }
  }

  /// Declare support for a platform.
  pub fn with_platform(mut self, platform: Platform) -> Self {
    self.platforms.push(platform);
    self.link_subspecs();
    self
  }

  /// Add a dependency to this node's own list.
  pub fn with_dependency(mut self, dependency: Dependency) -> Self {
    self.dependencies.push(dependency);
    self
  }

  /// Designate the only default subspec, by short name.
  pub fn with_main_subspec(mut self, name: impl Into<String>) -> Self {
    self.main_subspec = Some(name.into());
    self
  }

  /// Add a child subspec, configured by `build`.
  ///
  /// The child starts with the parent's version and inherited platforms and
  /// is given its full hierarchical name.
  pub fn with_subspec(mut self, name: &str, build: impl FnOnce(Specification) -> Specification) -> Self {
    let child = Specification {
      name: format!("{}{}{}", self.name, SUBSPEC_SEPARATOR, name),
      base_name: name.to_string(),
      version: self.version.clone(),
      platforms: Vec::new(),
      inherited_platforms: Some(self.available_platforms()),
      dependencies: Vec::new(),
      subspecs: Vec::new(),
      main_subspec: None,
    };
    self.subspecs.push(build(child));
    self.link_subspecs();
    self
  }

  /// Replace the declared platforms. Used by callers that re-target a spec.
  pub fn set_platforms(&mut self, platforms: Vec<Platform>) {
    self.platforms = platforms;
    self.link_subspecs();
  }

  /// Propagate name, version and platform restrictions down the tree.
  fn link_subspecs(&mut self) {
    let platforms = self.available_platforms();
    for child in &mut self.subspecs {
      child.name = format!("{}{}{}", self.name, SUBSPEC_SEPARATOR, child.base_name);
      child.version = self.version.clone();
      child.inherited_platforms = Some(platforms.clone());
      child.link_subspecs();
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn base_name(&self) -> &str {
    &self.base_name
  }

  /// Name of the top-level pod this node belongs to.
  pub fn root_name(&self) -> &str {
    root_name(&self.name)
  }

  pub fn version(&self) -> &Version {
    &self.version
  }

  pub fn is_subspec(&self) -> bool {
    self.inherited_platforms.is_some()
  }

  /// The platforms declared on this node, before inheritance.
  pub fn declared_platforms(&self) -> &[Platform] {
    &self.platforms
  }

  /// This node's own dependencies, excluding implicit subspec dependencies.
  pub fn dependencies(&self) -> &[Dependency] {
    &self.dependencies
  }

  pub fn subspecs(&self) -> &[Specification] {
    &self.subspecs
  }

  pub fn main_subspec(&self) -> Option<&str> {
    self.main_subspec.as_deref()
  }

  /// Platforms this node can be used on.
  ///
  /// A node declaring nothing supports every known platform; a subspec is
  /// further narrowed by its ancestors.
  pub fn available_platforms(&self) -> Vec<Platform> {
    let own = if self.platforms.is_empty() {
      Platform::all()
    } else {
      self.platforms.clone()
    };

    match &self.inherited_platforms {
      Some(inherited) => platform::narrow(inherited, &own),
      None => own,
    }
  }

  /// Navigate to the node named by a full hierarchical path.
  ///
  /// `name` must start with this node's own name; `spec.subspec_by_name(spec.name())`
  /// returns `spec` itself.
  pub fn subspec_by_name(&self, name: &str) -> Result<&Specification, SpecificationError> {
    let not_found = || SpecificationError::SubspecNotFound {
      name: name.to_string(),
      root: self.name.clone(),
    };

    if name == self.name {
      return Ok(self);
    }

    let relative = name
      .strip_prefix(self.name.as_str())
      .and_then(|rest| rest.strip_prefix(SUBSPEC_SEPARATOR))
      .ok_or_else(not_found)?;

    let mut node = self;
    for segment in relative.split(SUBSPEC_SEPARATOR) {
      node = node
        .subspecs
        .iter()
        .find(|child| child.base_name == segment)
        .ok_or_else(not_found)?;
    }
    Ok(node)
  }

  /// The subspecs used when this node is depended upon without a path.
  pub fn default_subspecs(&self) -> Result<Vec<&Specification>, SpecificationError> {
    match &self.main_subspec {
      Some(main) => {
        let short = main
          .strip_prefix(self.name.as_str())
          .and_then(|rest| rest.strip_prefix(SUBSPEC_SEPARATOR))
          .unwrap_or(main);
        let child = self
          .subspecs
          .iter()
          .find(|child| child.base_name == short)
          .ok_or_else(|| SpecificationError::MissingMainSubspec {
            spec: self.name.clone(),
            main_subspec: main.clone(),
          })?;
        Ok(vec![child])
      }
      None => Ok(self.subspecs.iter().collect()),
    }
  }

  /// Full names of [`Self::default_subspecs`].
  pub fn default_subspec_names(&self) -> Result<Vec<String>, SpecificationError> {
    Ok(
      self
        .default_subspecs()?
        .into_iter()
        .map(|child| child.name.clone())
        .collect(),
    )
  }

  /// This node's dependencies followed by one dependency per default subspec.
  pub fn all_dependencies(&self) -> Result<Vec<Dependency>, SpecificationError> {
    let mut all = self.dependencies.clone();
    all.extend(self.default_subspec_names()?.into_iter().map(Dependency::named));
    Ok(all)
  }
}

/// Serialized shape of a specification.
///
/// Subspecs carry their short name and usually omit `version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSpecification {
  name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  version: Option<Version>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  platforms: Vec<Platform>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  dependencies: Vec<Dependency>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  main_subspec: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  subspecs: Vec<RawSpecification>,
}

fn validate_name(name: &str) -> Result<(), SpecificationError> {
  let invalid = |reason: &str| SpecificationError::InvalidName {
    name: name.to_string(),
    reason: reason.to_string(),
  };
  if name.trim().is_empty() {
    return Err(invalid("name cannot be empty"));
  }
  if name.contains(SUBSPEC_SEPARATOR) {
    return Err(invalid("names cannot contain '/'"));
  }
  Ok(())
}

impl RawSpecification {
  fn into_child(self, parent: &Specification) -> Result<Specification, SpecificationError> {
    validate_name(&self.name)?;
    let mut child = Specification {
      name: format!("{}{}{}", parent.name, SUBSPEC_SEPARATOR, self.name),
      base_name: self.name,
      version: parent.version.clone(),
      platforms: self.platforms,
      inherited_platforms: Some(parent.available_platforms()),
      dependencies: self.dependencies,
      subspecs: Vec::new(),
      main_subspec: self.main_subspec,
    };
    for raw in self.subspecs {
      let grandchild = raw.into_child(&child)?;
      child.subspecs.push(grandchild);
    }
    Ok(child)
  }
}

impl TryFrom<RawSpecification> for Specification {
  type Error = SpecificationError;

  fn try_from(raw: RawSpecification) -> Result<Self, Self::Error> {
    validate_name(&raw.name)?;
    let version = raw.version.ok_or_else(|| SpecificationError::MissingVersion {
      name: raw.name.clone(),
    })?;

    let mut spec = Specification::new(raw.name, version);
    spec.platforms = raw.platforms;
    spec.dependencies = raw.dependencies;
    spec.main_subspec = raw.main_subspec;
    for child in raw.subspecs {
      let child = child.into_child(&spec)?;
      spec.subspecs.push(child);
    }
    Ok(spec)
  }
}

impl From<Specification> for RawSpecification {
  fn from(spec: Specification) -> Self {
    let version = if spec.is_subspec() { None } else { Some(spec.version) };
    RawSpecification {
      name: spec.base_name,
      version,
      platforms: spec.platforms,
      dependencies: spec.dependencies,
      main_subspec: spec.main_subspec,
      subspecs: spec.subspecs.into_iter().map(RawSpecification::from).collect(),
    }
  }
}
