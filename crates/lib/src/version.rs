//! Package versions, deployment targets and version requirements.
//!
//! Versions in the pod ecosystem are written with one to three numeric
//! components (`"4"`, `"10.7"`, `"0.10.0"`) and an optional pre-release
//! suffix (`"1.0.0-beta.1"`). They are normalised onto [`semver::Version`] so
//! that comparison is numeric per component, never lexicographic.
//!
//! # Requirement Syntax
//!
//! A [`Requirement`] is a comma separated list of constraints:
//!
//! | Constraint   | Meaning                         |
//! |--------------|---------------------------------|
//! | `1.0`        | exactly `1.0`                   |
//! | `= 1.0`      | exactly `1.0`                   |
//! | `!= 1.0`     | anything but `1.0`              |
//! | `> 1.0`      | strictly newer                  |
//! | `>= 1.0`     | `1.0` or newer                  |
//! | `< 2.0`      | strictly older                  |
//! | `<= 2.0`     | `2.0` or older                  |
//! | `~> 1.2`     | `>= 1.2, < 2.0`                 |
//! | `~> 1.2.3`   | `>= 1.2.3, < 1.3`               |

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of numeric components accepted in a version.
pub const MAX_COMPONENTS: usize = 3;

/// Errors that can occur when parsing versions or requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
  /// The version string was empty.
  #[error("empty version string")]
  Empty,

  /// A numeric component could not be parsed.
  #[error("invalid version '{version}': component '{component}' is not a number")]
  InvalidComponent { version: String, component: String },

  /// Too many numeric components.
  #[error("invalid version '{version}': at most {MAX_COMPONENTS} components are supported")]
  TooManyComponents { version: String },

  /// The pre-release suffix was malformed.
  #[error("invalid version '{version}': bad pre-release '{prerelease}'")]
  InvalidPrerelease { version: String, prerelease: String },

  /// A requirement constraint was malformed.
  #[error("invalid requirement '{requirement}': {reason}")]
  InvalidRequirement { requirement: String, reason: String },
}

/// A package version or deployment target.
///
/// Equality and ordering are semantic: `"4"`, `"4.0"` and `"4.0.0"` are equal,
/// and `"10.7"` sorts after `"4.3"`. The original spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
  raw: String,
  semver: semver::Version,
  components: usize,
}

impl Version {
  /// Parse a version string.
  pub fn parse(input: &str) -> Result<Self, VersionError> {
    let raw = input.trim();
    if raw.is_empty() {
      return Err(VersionError::Empty);
    }

    let (numeric, prerelease) = match raw.split_once('-') {
      Some((numeric, pre)) => (numeric, Some(pre)),
      None => (raw, None),
    };

    let mut parts = [0u64; MAX_COMPONENTS];
    let mut components = 0;
    for component in numeric.split('.') {
      if components == MAX_COMPONENTS {
        return Err(VersionError::TooManyComponents { version: raw.to_string() });
      }
      parts[components] = component.parse().map_err(|_| VersionError::InvalidComponent {
        version: raw.to_string(),
        component: component.to_string(),
      })?;
      components += 1;
    }

    let mut semver = semver::Version::new(parts[0], parts[1], parts[2]);
    if let Some(pre) = prerelease {
      semver.pre = semver::Prerelease::new(pre).map_err(|_| VersionError::InvalidPrerelease {
        version: raw.to_string(),
        prerelease: pre.to_string(),
      })?;
    }

    Ok(Self {
      raw: raw.to_string(),
      semver,
      components,
    })
  }

  /// The normalised semantic version.
  pub fn as_semver(&self) -> &semver::Version {
    &self.semver
  }

  /// The version as originally written.
  pub fn as_str(&self) -> &str {
    &self.raw
  }

  /// Number of numeric components as written (1 to 3).
  pub fn components(&self) -> usize {
    self.components
  }

  /// Whether this version carries a pre-release suffix.
  pub fn is_prerelease(&self) -> bool {
    !self.semver.pre.is_empty()
  }
}

impl PartialEq for Version {
  fn eq(&self, other: &Self) -> bool {
    self.semver == other.semver
  }
}

impl Eq for Version {}

impl Hash for Version {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.semver.hash(state);
  }
}

impl PartialOrd for Version {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Version {
  fn cmp(&self, other: &Self) -> Ordering {
    self.semver.cmp(&other.semver)
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.raw)
  }
}

impl std::str::FromStr for Version {
  type Err = VersionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl TryFrom<String> for Version {
  type Error = VersionError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value)
  }
}

impl From<Version> for String {
  fn from(value: Version) -> Self {
    value.raw
  }
}

/// A version requirement attached to a dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Requirement {
  raw: String,
  req: semver::VersionReq,
  excluded: Vec<semver::Version>,
}

impl Requirement {
  /// Parse a requirement string such as `"~> 1.2, != 1.2.5"`.
  pub fn parse(input: &str) -> Result<Self, VersionError> {
    let raw = input.trim();
    let invalid = |reason: &str| VersionError::InvalidRequirement {
      requirement: raw.to_string(),
      reason: reason.to_string(),
    };

    if raw.is_empty() {
      return Err(invalid("no constraints"));
    }

    let mut comparators = Vec::new();
    let mut excluded = Vec::new();

    for constraint in raw.split(',').map(str::trim) {
      if constraint.is_empty() {
        return Err(invalid("empty constraint"));
      }

      let (op, rest) = split_operator(constraint);
      let version = Version::parse(rest).map_err(|e| invalid(&e.to_string()))?;
      let v = version.as_semver();

      match op {
        "=" => comparators.push(format!("={v}")),
        "!=" => excluded.push(v.clone()),
        ">" | ">=" | "<" | "<=" => comparators.push(format!("{op}{v}")),
        "~>" => {
          comparators.push(format!(">={v}"));
          let upper = match version.components() {
            1 | 2 => semver::Version::new(v.major + 1, 0, 0),
            _ => semver::Version::new(v.major, v.minor + 1, 0),
          };
          comparators.push(format!("<{upper}"));
        }
        other => return Err(invalid(&format!("unknown operator '{other}'"))),
      }
    }

    let req = if comparators.is_empty() {
      semver::VersionReq::STAR
    } else {
      semver::VersionReq::parse(&comparators.join(", ")).map_err(|e| invalid(&e.to_string()))?
    };

    Ok(Self {
      raw: raw.to_string(),
      req,
      excluded,
    })
  }

  /// Whether the given version satisfies every constraint.
  pub fn matches(&self, version: &Version) -> bool {
    let v = version.as_semver();
    self.req.matches(v) && !self.excluded.contains(v)
  }

  /// The requirement as originally written.
  pub fn as_str(&self) -> &str {
    &self.raw
  }
}

/// Split a constraint into its operator and version text. A bare version is `=`.
fn split_operator(constraint: &str) -> (&str, &str) {
  for op in ["~>", ">=", "<=", "!=", ">", "<", "="] {
    if let Some(rest) = constraint.strip_prefix(op) {
      return (op, rest.trim());
    }
  }
  ("=", constraint)
}

impl PartialEq for Requirement {
  fn eq(&self, other: &Self) -> bool {
    self.req == other.req && self.excluded == other.excluded
  }
}

impl Eq for Requirement {}

impl fmt::Display for Requirement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.raw)
  }
}

impl std::str::FromStr for Requirement {
  type Err = VersionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl TryFrom<String> for Requirement {
  type Error = VersionError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value)
  }
}

impl From<Requirement> for String {
  fn from(value: Requirement) -> Self {
    value.raw
  }
}
