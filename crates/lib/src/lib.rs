//! podres-lib: Podfile dependency resolution
//!
//! This crate turns a podfile (target definitions, each with a platform and a
//! list of dependencies) into the complete set of specifications each target
//! needs:
//! - `Specification`: one pod version and its tree of subspecs
//! - `SpecificationSet`: every known version of a pod, answering version queries
//! - `SetSource`: where sets come from (memory, on-disk spec repositories)
//! - `Resolver`: the recursive expansion with platform checks and set caching

pub mod config;
pub mod consts;
pub mod platform;
pub mod podfile;
pub mod resolver;
pub mod set;
pub mod source;
pub mod specification;
pub mod version;

pub use config::Config;
pub use platform::{Platform, PlatformName};
pub use podfile::{Podfile, Sandbox, TargetDefinition};
pub use resolver::{ResolveError, Resolution, ResolvedTarget, Resolver};
pub use set::{SpecificationSet, SourceSet};
pub use source::{RepoSource, SetSource, SourceList};
pub use specification::{Dependency, Specification};
pub use version::{Requirement, Version};
