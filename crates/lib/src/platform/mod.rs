//! Platforms, deployment targets and the compatibility check.
//!
//! A [`Platform`] pairs a [`PlatformName`] with an optional minimum OS version
//! (the deployment target). Target definitions require exactly one platform;
//! specifications declare the set of platforms they support.

pub mod name;
pub mod paths;

pub use name::{PlatformName, UnknownPlatform};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// A platform family plus an optional minimum OS version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
  pub name: PlatformName,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deployment_target: Option<Version>,
}

impl Platform {
  /// Create a platform without a deployment target
  pub fn new(name: PlatformName) -> Self {
    Self {
      name,
      deployment_target: None,
    }
  }

  /// Create a platform with a minimum OS version
  pub fn with_target(name: PlatformName, deployment_target: Version) -> Self {
    Self {
      name,
      deployment_target: Some(deployment_target),
    }
  }

  pub fn ios() -> Self {
    Self::new(PlatformName::Ios)
  }

  pub fn osx() -> Self {
    Self::new(PlatformName::Osx)
  }

  /// Every known platform family without a deployment target.
  ///
  /// This is what a specification that declares no platform supports.
  pub fn all() -> Vec<Self> {
    PlatformName::ALL.into_iter().map(Self::new).collect()
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.deployment_target {
      Some(target) => write!(f, "{} {}", self.name, target),
      None => write!(f, "{}", self.name),
    }
  }
}

/// Outcome of checking a target platform against a specification's platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
  Compatible,

  /// The specification does not list the target's platform family at all.
  MissingPlatform,

  /// The family matches but the specification needs a newer OS than the
  /// target guarantees.
  DeploymentTargetTooLow { required: Version },
}

impl Compatibility {
  pub fn is_compatible(&self) -> bool {
    matches!(self, Compatibility::Compatible)
  }
}

/// Check whether `target` can use a specification supporting `available`.
///
/// The entry whose name matches the target decides. If either side has no
/// deployment target the pair is compatible; otherwise the specification's
/// minimum must not exceed the target's.
pub fn check_compatibility(target: &Platform, available: &[Platform]) -> Compatibility {
  let Some(supported) = available.iter().find(|p| p.name == target.name) else {
    return Compatibility::MissingPlatform;
  };

  match (&supported.deployment_target, &target.deployment_target) {
    (Some(required), Some(minimum)) if required > minimum => Compatibility::DeploymentTargetTooLow {
      required: required.clone(),
    },
    _ => Compatibility::Compatible,
  }
}

/// Boolean form of [`check_compatibility`].
pub fn is_compatible(target: &Platform, available: &[Platform]) -> bool {
  check_compatibility(target, available).is_compatible()
}

/// Restrict `child` platforms to what `parent` allows.
///
/// Families absent from `parent` are dropped; shared families keep the higher
/// of the two deployment targets. A subspec can narrow, never widen.
pub fn narrow(parent: &[Platform], child: &[Platform]) -> Vec<Platform> {
  child
    .iter()
    .filter_map(|platform| {
      let inherited = parent.iter().find(|p| p.name == platform.name)?;
      let deployment_target = match (&inherited.deployment_target, &platform.deployment_target) {
        (Some(a), Some(b)) => Some(a.max(b).clone()),
        (a, b) => a.clone().or_else(|| b.clone()),
      };
      Some(Platform {
        name: platform.name,
        deployment_target,
      })
    })
    .collect()
}
