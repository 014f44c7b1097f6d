use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform families a pod can declare support for
///
/// Parsing is case-insensitive and accepts `macos` for the osx family; the
/// same rules apply when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum PlatformName {
  Ios,
  Osx,
}

impl PlatformName {
  /// Every known platform family, in declaration order
  pub const ALL: [PlatformName; 2] = [PlatformName::Ios, PlatformName::Osx];

  /// Returns the lowercase string identifier for this platform
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Ios => "ios",
      Self::Osx => "osx",
    }
  }
}

impl fmt::Display for PlatformName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Error returned when a platform name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{0}' (expected one of: ios, osx)")]
pub struct UnknownPlatform(pub String);

impl FromStr for PlatformName {
  type Err = UnknownPlatform;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "ios" => Ok(Self::Ios),
      "osx" | "macos" => Ok(Self::Osx),
      _ => Err(UnknownPlatform(s.to_string())),
    }
  }
}

impl TryFrom<String> for PlatformName {
  type Error = UnknownPlatform;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<PlatformName> for &'static str {
  fn from(value: PlatformName) -> Self {
    value.as_str()
  }
}
