//! Resolution failures.

use thiserror::Error;

use super::types::Requester;
use crate::platform::Platform;
use crate::set::{SetError, requirement_label, version_list};
use crate::source::SourceError;
use crate::specification::SpecificationError;
use crate::version::{Requirement, Version};

/// Errors that abort a [`Resolver::resolve`](super::Resolver::resolve) call.
///
/// Most variants are informative: they describe a mismatch between what the
/// podfile asks for and what the sources offer, and are meant to be shown to
/// the user as-is. [`ResolveError::Source`] and [`ResolveError::Internal`]
/// are faults in the environment or in the specification data.
#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("unable to find a specification for '{name}' (required by {required_by})")]
  UnknownPackage { name: String, required_by: Requester },

  #[error(
    "no version of '{name}' satisfies '{}' (required by {required_by}, available: {})",
    requirement_label(.requirement),
    version_list(.available)
  )]
  NoMatchingVersion {
    name: String,
    requirement: Option<Requirement>,
    available: Vec<Version>,
    required_by: Requester,
  },

  #[error(
    "{required_by} requires '{name}' ({requirement}) but version {activated} was already activated by {activated_by}"
  )]
  VersionConflict {
    name: String,
    requirement: String,
    activated: Version,
    activated_by: Requester,
    required_by: Requester,
  },

  #[error("unable to find subspec '{name}' in '{root}' (required by {required_by})")]
  SubspecNotFound {
    name: String,
    root: String,
    required_by: Requester,
  },

  #[error("the platform of target '{target}' ({platform}) is not compatible with '{spec}' ({version}) which supports {}", platform_list(.available))]
  IncompatiblePlatform {
    spec: String,
    version: Version,
    target: String,
    platform: Platform,
    available: Vec<Platform>,
  },

  #[error("target '{target}' deploys to {platform} but '{spec}' ({version}) requires at least {required}")]
  IncompatibleDeploymentTarget {
    spec: String,
    version: Version,
    target: String,
    platform: Platform,
    required: Version,
  },

  /// A node was reached again while its own dependencies were still being
  /// expanded. This includes back edges onto an accepted ancestor, such as a
  /// subspec depending on its parent, which are rejected rather than skipped.
  #[error("cyclic dependency: {}", .chain.join(" -> "))]
  CyclicDependency { chain: Vec<String> },

  #[error(transparent)]
  Source(#[from] SourceError),

  #[error("malformed specification: {0}")]
  Internal(#[source] SpecificationError),
}

impl ResolveError {
  /// Whether this is a user-facing mismatch rather than an I/O or data fault.
  pub fn is_informative(&self) -> bool {
    !matches!(self, ResolveError::Source(_) | ResolveError::Internal(_))
  }

  pub(crate) fn from_set_error(err: SetError, required_by: &Requester) -> Self {
    match err {
      SetError::NoMatchingVersion {
        name,
        requirement,
        available,
      } => ResolveError::NoMatchingVersion {
        name,
        requirement,
        available,
        required_by: required_by.clone(),
      },
      SetError::Empty { name } => ResolveError::NoMatchingVersion {
        name,
        requirement: None,
        available: Vec::new(),
        required_by: required_by.clone(),
      },
    }
  }

  pub(crate) fn from_specification_error(err: SpecificationError, required_by: &Requester) -> Self {
    match err {
      SpecificationError::SubspecNotFound { name, root } => ResolveError::SubspecNotFound {
        name,
        root,
        required_by: required_by.clone(),
      },
      other => ResolveError::Internal(other),
    }
  }
}

fn platform_list(platforms: &[Platform]) -> String {
  if platforms.is_empty() {
    return "no platform".to_string();
  }
  platforms.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ")
}
