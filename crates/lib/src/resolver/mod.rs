//! Dependency resolution.
//!
//! The [`Resolver`] expands every target definition of a [`Podfile`] into the
//! deduplicated list of specification nodes it needs.
//!
//! # Algorithm
//!
//! For each dependency, in declaration order:
//!
//! 1. Activate the top-level pod. The first specification chosen for a name
//!    stays activated for the rest of the `resolve` call; a later requirement
//!    it does not satisfy, or an inline specification that differs from it,
//!    is a [`ResolveError::VersionConflict`].
//! 2. Navigate to the node the dependency names (the root, or a subspec).
//! 3. Skip it if the target already has it.
//! 4. Check it against the target's platform.
//! 5. Accept it and recurse into its dependencies, including its default
//!    subspecs ([`Specification::all_dependencies`]).
//!
//! Nodes currently being expanded form a stack; reaching one of them again
//! is a [`ResolveError::CyclicDependency`].
//!
//! # Caching
//!
//! Specification sets are cached per resolver by top-level name and reused
//! across targets and `resolve` calls. The cache lock is held while a missing
//! set is fetched, so each name is looked up at most once per resolver.

mod error;
mod types;

pub use error::ResolveError;
pub use types::{Requester, Resolution, ResolvedTarget};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, trace};

use crate::platform::{self, Compatibility};
use crate::podfile::{Podfile, Sandbox, TargetDefinition};
use crate::set::{ExternalSet, SpecificationSet};
use crate::source::SetSource;
use crate::specification::{Dependency, Specification};

/// Resolves podfiles against a [`SetSource`].
pub struct Resolver {
  source: Box<dyn SetSource>,
  sandbox: Sandbox,
  cached_sets: Mutex<BTreeMap<String, Arc<dyn SpecificationSet>>>,
}

impl Resolver {
  pub fn new(source: impl SetSource + 'static, sandbox: Sandbox) -> Self {
    Self {
      source: Box::new(source),
      sandbox,
      cached_sets: Mutex::new(BTreeMap::new()),
    }
  }

  pub fn sandbox(&self) -> &Sandbox {
    &self.sandbox
  }

  /// Snapshot of every set looked up (or seeded) so far, by top-level name.
  pub fn cached_sets(&self) -> BTreeMap<String, Arc<dyn SpecificationSet>> {
    self.cache().clone()
  }

  /// Seed the cache, replacing any set already cached under the same name.
  ///
  /// Later lookups of that name use `set` without consulting the source.
  pub fn cache_set(&self, set: Arc<dyn SpecificationSet>) {
    let name = set.name().to_string();
    debug!(name = %name, "seeded specification set");
    self.cache().insert(name, set);
  }

  /// Resolve every target definition of `podfile`.
  ///
  /// Version activations are shared by all targets of this call. The first
  /// failure aborts the whole call.
  pub fn resolve(&self, podfile: &Podfile) -> Result<Resolution, ResolveError> {
    info!(targets = podfile.targets.len(), "resolving podfile");

    let mut session = Session::default();
    let mut resolution = Resolution::default();
    for target in &podfile.targets {
      resolution.push(self.walk_target(target, &mut session)?);
    }

    info!(
      targets = resolution.len(),
      activated = session.activated.len(),
      "resolution complete"
    );
    Ok(resolution)
  }

  /// Resolve a single target definition on its own.
  pub fn resolve_target(&self, target: &TargetDefinition) -> Result<ResolvedTarget, ResolveError> {
    self.walk_target(target, &mut Session::default())
  }

  fn walk_target(&self, target: &TargetDefinition, session: &mut Session) -> Result<ResolvedTarget, ResolveError> {
    debug!(target = %target.name, platform = %target.platform, "resolving target");

    let mut walk = Walk {
      resolver: self,
      session,
      target,
      specs: Vec::new(),
      loaded: HashSet::new(),
      expanding: Vec::new(),
    };

    let requester = Requester::Target(target.name.clone());
    for dependency in &target.dependencies {
      walk.resolve_dependency(dependency, &requester)?;
    }

    debug!(target = %target.name, specs = walk.specs.len(), "resolved target");
    Ok(ResolvedTarget {
      name: target.name.clone(),
      platform: target.platform.clone(),
      specs: walk.specs,
    })
  }

  fn cache(&self) -> MutexGuard<'_, BTreeMap<String, Arc<dyn SpecificationSet>>> {
    self.cached_sets.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Cached set for `name`, fetching it from the source on first use.
  fn set_for(&self, name: &str, required_by: &Requester) -> Result<Arc<dyn SpecificationSet>, ResolveError> {
    let mut cache = self.cache();
    if let Some(set) = cache.get(name) {
      trace!(name, "specification set cache hit");
      return Ok(Arc::clone(set));
    }

    let set = self
      .source
      .find_set(name)?
      .ok_or_else(|| ResolveError::UnknownPackage {
        name: name.to_string(),
        required_by: required_by.clone(),
      })?;

    debug!(name, versions = set.versions().len(), "cached specification set");
    cache.insert(name.to_string(), Arc::clone(&set));
    Ok(set)
  }

  /// Make an inline specification answer later lookups of its name.
  fn cache_inline(&self, spec: &Arc<Specification>) {
    self
      .cache()
      .entry(spec.root_name().to_string())
      .or_insert_with(|| {
        debug!(name = %spec.name(), version = %spec.version(), "cached inline specification");
        Arc::new(ExternalSet::new(Arc::clone(spec)))
      });
  }
}

impl std::fmt::Debug for Resolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Resolver")
      .field("sandbox", &self.sandbox)
      .field("cached_sets", &self.cache().keys().collect::<Vec<_>>())
      .finish_non_exhaustive()
  }
}

struct Activation {
  spec: Arc<Specification>,
  required_by: Requester,
}

/// State shared by every target of one `resolve` call.
#[derive(Default)]
struct Session {
  activated: HashMap<String, Activation>,
}

/// State of one target's expansion.
struct Walk<'a> {
  resolver: &'a Resolver,
  session: &'a mut Session,
  target: &'a TargetDefinition,
  /// Accepted nodes, in acceptance order.
  specs: Vec<Arc<Specification>>,
  /// Full names of accepted nodes.
  loaded: HashSet<String>,
  /// Full names of nodes whose dependencies are being expanded.
  expanding: Vec<String>,
}

impl Walk<'_> {
  fn resolve_dependency(&mut self, dependency: &Dependency, required_by: &Requester) -> Result<(), ResolveError> {
    let root = self.activate(dependency, required_by)?;
    let name = dependency.name();

    if let Some(pos) = self.expanding.iter().position(|n| n == name) {
      let mut chain = self.expanding[pos..].to_vec();
      chain.push(name.to_string());
      return Err(ResolveError::CyclicDependency { chain });
    }

    if self.loaded.contains(name) {
      trace!(target = %self.target.name, name, "already resolved");
      return Ok(());
    }

    let node = root
      .subspec_by_name(name)
      .map_err(|e| ResolveError::from_specification_error(e, required_by))?;

    self.check_platform(node)?;

    debug!(
      target = %self.target.name,
      name,
      version = %node.version(),
      required_by = %required_by,
      "accepted specification"
    );
    self.loaded.insert(name.to_string());
    self.specs.push(if node.is_subspec() {
      Arc::new(node.clone())
    } else {
      Arc::clone(&root)
    });

    let dependencies = node.all_dependencies().map_err(ResolveError::Internal)?;
    let requester = Requester::Specification(name.to_string());
    self.expanding.push(name.to_string());
    for child in &dependencies {
      self.resolve_dependency(child, &requester)?;
    }
    self.expanding.pop();

    Ok(())
  }

  /// Top-level specification for `dependency`, activating it on first use.
  fn activate(&mut self, dependency: &Dependency, required_by: &Requester) -> Result<Arc<Specification>, ResolveError> {
    let root_name = dependency.root_name();

    if let Some(activation) = self.session.activated.get(root_name) {
      let activated = activation.spec.version();
      let conflict = match dependency {
        Dependency::Named {
          requirement: Some(requirement),
          ..
        } if !requirement.matches(activated) => Some(requirement.to_string()),
        Dependency::Inline(spec) if spec.version() != activated => Some(format!("= {}", spec.version())),
        Dependency::Inline(spec) if **spec != *activation.spec => Some(format!("= {} (inline)", spec.version())),
        _ => None,
      };

      return match conflict {
        Some(requirement) => Err(ResolveError::VersionConflict {
          name: root_name.to_string(),
          requirement,
          activated: activated.clone(),
          activated_by: activation.required_by.clone(),
          required_by: required_by.clone(),
        }),
        None => Ok(Arc::clone(&activation.spec)),
      };
    }

    let spec = match dependency {
      Dependency::Inline(spec) => {
        self.resolver.cache_inline(spec);
        Arc::clone(spec)
      }
      Dependency::Named { .. } => self
        .resolver
        .set_for(root_name, required_by)?
        .specification_for(dependency.requirement())
        .map_err(|e| ResolveError::from_set_error(e, required_by))?,
    };

    debug!(
      name = root_name,
      version = %spec.version(),
      required_by = %required_by,
      "activated specification"
    );
    self.session.activated.insert(
      root_name.to_string(),
      Activation {
        spec: Arc::clone(&spec),
        required_by: required_by.clone(),
      },
    );
    Ok(spec)
  }

  fn check_platform(&self, node: &Specification) -> Result<(), ResolveError> {
    let target = &self.target.platform;
    let available = node.available_platforms();

    match platform::check_compatibility(target, &available) {
      Compatibility::Compatible => Ok(()),
      Compatibility::MissingPlatform => {
        debug!(target = %self.target.name, name = %node.name(), "rejected: platform not supported");
        Err(ResolveError::IncompatiblePlatform {
          spec: node.name().to_string(),
          version: node.version().clone(),
          target: self.target.name.clone(),
          platform: target.clone(),
          available,
        })
      }
      Compatibility::DeploymentTargetTooLow { required } => {
        debug!(target = %self.target.name, name = %node.name(), %required, "rejected: deployment target too low");
        Err(ResolveError::IncompatibleDeploymentTarget {
          spec: node.name().to_string(),
          version: node.version().clone(),
          target: self.target.name.clone(),
          platform: target.clone(),
          required,
        })
      }
    }
  }
}
