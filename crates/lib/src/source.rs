//! Specification sources.
//!
//! A source answers `find_set(name)`: the [`SpecificationSet`] of every known
//! version of a top-level pod, or `None` when it does not know the pod.
//!
//! # Repository Layout
//!
//! [`RepoSource`] reads a directory of JSON specifications:
//!
//! ```text
//! <repo>/
//!   RestKit/
//!     0.10.0/RestKit.podspec.json
//!     0.9.3/RestKit.podspec.json
//!   SOCKit/
//!     1.0/SOCKit.podspec.json
//! ```
//!
//! Each version directory holds exactly one `<Name>.podspec.json` whose
//! `name` and `version` must match the directory names.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::consts::PODSPEC_EXTENSION;
use crate::set::{SourceSet, SpecificationSet};
use crate::specification::Specification;
use crate::version::Version;

/// Errors that can occur while reading a source.
#[derive(Debug, Error)]
pub enum SourceError {
  /// Failed to read a specification file or directory.
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to walk a repository directory.
  #[error("failed to scan {}: {source}", path.display())]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  /// A specification file is not valid JSON or not a valid specification.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// A specification's contents disagree with its location in the repository.
  #[error("{} declares {found} but is stored as {expected}", path.display())]
  Mismatch {
    path: PathBuf,
    expected: String,
    found: String,
  },
}

/// Something that can look up specification sets by top-level pod name.
pub trait SetSource: Send + Sync {
  /// Find the set for `name`, or `Ok(None)` if this source does not know it.
  fn find_set(&self, name: &str) -> Result<Option<Arc<dyn SpecificationSet>>, SourceError>;
}

/// A source holding specifications in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
  specs: BTreeMap<String, Vec<Arc<Specification>>>,
}

impl MemorySource {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a top-level specification.
  pub fn add(&mut self, spec: Specification) {
    self
      .specs
      .entry(spec.name().to_string())
      .or_default()
      .push(Arc::new(spec));
  }

  /// Builder form of [`Self::add`].
  pub fn with(mut self, spec: Specification) -> Self {
    self.add(spec);
    self
  }

  pub fn len(&self) -> usize {
    self.specs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.specs.is_empty()
  }
}

impl FromIterator<Specification> for MemorySource {
  fn from_iter<I: IntoIterator<Item = Specification>>(iter: I) -> Self {
    let mut source = MemorySource::new();
    for spec in iter {
      source.add(spec);
    }
    source
  }
}

impl SetSource for MemorySource {
  fn find_set(&self, name: &str) -> Result<Option<Arc<dyn SpecificationSet>>, SourceError> {
    Ok(self.specs.get(name).map(|specs| {
      let set: Arc<dyn SpecificationSet> = Arc::new(SourceSet::new(name, specs.iter().cloned()));
      set
    }))
  }
}

/// A spec repository on disk.
#[derive(Debug, Clone)]
pub struct RepoSource {
  root: PathBuf,
}

impl RepoSource {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Names of every pod in the repository, sorted.
  pub fn pod_names(&self) -> Result<Vec<String>, SourceError> {
    subdirectories(&self.root)
  }

  /// Read and validate one specification file.
  fn load_spec(&self, path: &Path, name: &str, version_dir: &str) -> Result<Specification, SourceError> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let spec: Specification = serde_json::from_str(&content).map_err(|source| SourceError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let mismatch = |expected: String, found: String| SourceError::Mismatch {
      path: path.to_path_buf(),
      expected,
      found,
    };

    if spec.name() != name {
      return Err(mismatch(format!("name '{name}'"), format!("name '{}'", spec.name())));
    }
    if Version::parse(version_dir).ok().as_ref() != Some(spec.version()) {
      return Err(mismatch(
        format!("version '{version_dir}'"),
        format!("version '{}'", spec.version()),
      ));
    }

    Ok(spec)
  }
}

impl SetSource for RepoSource {
  fn find_set(&self, name: &str) -> Result<Option<Arc<dyn SpecificationSet>>, SourceError> {
    let pod_dir = self.root.join(name);
    if !pod_dir.is_dir() {
      trace!(repo = %self.root.display(), name, "pod not in repository");
      return Ok(None);
    }

    let file_name = format!("{name}{PODSPEC_EXTENSION}");
    let mut specs = Vec::new();

    for entry in WalkDir::new(&pod_dir).min_depth(2).max_depth(2).sort_by_file_name() {
      let entry = entry.map_err(|source| SourceError::Walk {
        path: pod_dir.clone(),
        source,
      })?;
      if !entry.file_type().is_file() || entry.file_name().to_string_lossy() != file_name {
        continue;
      }

      let version_dir = entry
        .path()
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

      specs.push(Arc::new(self.load_spec(entry.path(), name, &version_dir)?));
    }

    if specs.is_empty() {
      debug!(repo = %self.root.display(), name, "pod directory holds no specifications");
      return Ok(None);
    }

    debug!(repo = %self.root.display(), name, versions = specs.len(), "loaded specification set");
    Ok(Some(Arc::new(SourceSet::new(name, specs))))
  }
}

/// Several sources searched in order; the first that knows a pod owns it.
#[derive(Default)]
pub struct SourceList {
  sources: Vec<Box<dyn SetSource>>,
}

impl SourceList {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, source: impl SetSource + 'static) {
    self.sources.push(Box::new(source));
  }

  /// Builder form of [`Self::push`].
  pub fn with(mut self, source: impl SetSource + 'static) -> Self {
    self.push(source);
    self
  }

  /// One [`RepoSource`] per subdirectory of `repos_dir`, in name order.
  ///
  /// A missing `repos_dir` yields an empty list.
  pub fn from_repos_dir(repos_dir: &Path) -> Result<Self, SourceError> {
    let mut list = SourceList::new();
    if !repos_dir.is_dir() {
      debug!(path = %repos_dir.display(), "repos directory does not exist");
      return Ok(list);
    }

    for repo in subdirectories(repos_dir)? {
      list.push(RepoSource::new(repos_dir.join(repo)));
    }
    Ok(list)
  }

  /// Names of the repositories [`Self::from_repos_dir`] would use.
  pub fn repo_names(repos_dir: &Path) -> Result<Vec<String>, SourceError> {
    if !repos_dir.is_dir() {
      return Ok(Vec::new());
    }
    subdirectories(repos_dir)
  }

  pub fn len(&self) -> usize {
    self.sources.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sources.is_empty()
  }
}

impl SetSource for SourceList {
  fn find_set(&self, name: &str) -> Result<Option<Arc<dyn SpecificationSet>>, SourceError> {
    for source in &self.sources {
      if let Some(set) = source.find_set(name)? {
        return Ok(Some(set));
      }
    }
    Ok(None)
  }
}

/// Sorted names of the visible subdirectories of `dir`.
fn subdirectories(dir: &Path) -> Result<Vec<String>, SourceError> {
  let read_error = |source| SourceError::Read {
    path: dir.to_path_buf(),
    source,
  };

  let mut names = Vec::new();
  for entry in fs::read_dir(dir).map_err(read_error)? {
    let entry = entry.map_err(read_error)?;
    let name = entry.file_name().to_string_lossy().to_string();
    if entry.path().is_dir() && !name.starts_with('.') {
      names.push(name);
    }
  }
  names.sort();
  Ok(names)
}

impl<S: SetSource + ?Sized> SetSource for Arc<S> {
  fn find_set(&self, name: &str) -> Result<Option<Arc<dyn SpecificationSet>>, SourceError> {
    (**self).find_set(name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
  }

  fn write_spec(repo: &Path, name: &str, version: &str, json: &str) {
    let dir = repo.join(name).join(version);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{name}{PODSPEC_EXTENSION}")), json).unwrap();
  }

  mod memory_source {
    use super::*;

    #[test]
    fn finds_known_pods() {
      let source: MemorySource = [
        Specification::new("SOCKit", v("1.0")),
        Specification::new("SOCKit", v("1.1")),
      ]
      .into_iter()
      .collect();

      let set = source.find_set("SOCKit").unwrap().unwrap();
      assert_eq!(set.name(), "SOCKit");
      assert_eq!(set.versions(), vec![v("1.1"), v("1.0")]);
    }

    #[test]
    fn unknown_pod_is_none() {
      let source = MemorySource::new();
      assert!(source.find_set("Nope").unwrap().is_none());
    }
  }

  mod repo_source {
    use super::*;

    #[test]
    fn loads_every_version() {
      let temp = TempDir::new().unwrap();
      write_spec(temp.path(), "SOCKit", "1.0", r#"{ "name": "SOCKit", "version": "1.0" }"#);
      write_spec(temp.path(), "SOCKit", "1.1", r#"{ "name": "SOCKit", "version": "1.1" }"#);

      let repo = RepoSource::new(temp.path());
      let set = repo.find_set("SOCKit").unwrap().unwrap();
      assert_eq!(set.versions(), vec![v("1.1"), v("1.0")]);
      assert_eq!(repo.pod_names().unwrap(), vec!["SOCKit"]);
    }

    #[test]
    fn missing_pod_is_none() {
      let temp = TempDir::new().unwrap();
      assert!(RepoSource::new(temp.path()).find_set("SOCKit").unwrap().is_none());
    }

    #[test]
    fn ignores_unrelated_files() {
      let temp = TempDir::new().unwrap();
      write_spec(temp.path(), "SOCKit", "1.0", r#"{ "name": "SOCKit", "version": "1.0" }"#);
      fs::write(temp.path().join("SOCKit").join("1.0").join("README"), "hi").unwrap();

      let set = RepoSource::new(temp.path()).find_set("SOCKit").unwrap().unwrap();
      assert_eq!(set.versions().len(), 1);
    }

    #[test]
    fn pod_directory_without_specs_is_none() {
      let temp = TempDir::new().unwrap();
      fs::create_dir_all(temp.path().join("SOCKit").join("1.0")).unwrap();
      assert!(RepoSource::new(temp.path()).find_set("SOCKit").unwrap().is_none());
    }

    #[test]
    fn invalid_json_is_an_error() {
      let temp = TempDir::new().unwrap();
      write_spec(temp.path(), "SOCKit", "1.0", "{ not json");

      let err = RepoSource::new(temp.path()).find_set("SOCKit").unwrap_err();
      assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn version_must_match_directory() {
      let temp = TempDir::new().unwrap();
      write_spec(temp.path(), "SOCKit", "1.0", r#"{ "name": "SOCKit", "version": "2.0" }"#);

      let err = RepoSource::new(temp.path()).find_set("SOCKit").unwrap_err();
      assert!(matches!(err, SourceError::Mismatch { .. }));
      assert!(err.to_string().contains("version '2.0'"));
    }

    #[test]
    fn name_must_match_directory() {
      let temp = TempDir::new().unwrap();
      write_spec(temp.path(), "SOCKit", "1.0", r#"{ "name": "Other", "version": "1.0" }"#);

      let err = RepoSource::new(temp.path()).find_set("SOCKit").unwrap_err();
      assert!(matches!(err, SourceError::Mismatch { .. }));
    }
  }

  mod source_list {
    use super::*;

    #[test]
    fn first_source_wins() {
      let first = MemorySource::new().with(Specification::new("SOCKit", v("1.0")));
      let second = MemorySource::new()
        .with(Specification::new("SOCKit", v("2.0")))
        .with(Specification::new("JSONKit", v("1.4")));

      let list = SourceList::new().with(first).with(second);
      assert_eq!(list.len(), 2);

      let sockit = list.find_set("SOCKit").unwrap().unwrap();
      assert_eq!(sockit.versions(), vec![v("1.0")]);
      assert!(list.find_set("JSONKit").unwrap().is_some());
      assert!(list.find_set("Nope").unwrap().is_none());
    }

    #[test]
    fn builds_from_repos_directory() {
      let temp = TempDir::new().unwrap();
      write_spec(
        &temp.path().join("master"),
        "SOCKit",
        "1.0",
        r#"{ "name": "SOCKit", "version": "1.0" }"#,
      );
      write_spec(
        &temp.path().join("private"),
        "Internal",
        "0.1",
        r#"{ "name": "Internal", "version": "0.1" }"#,
      );

      let list = SourceList::from_repos_dir(temp.path()).unwrap();
      assert_eq!(list.len(), 2);
      assert_eq!(SourceList::repo_names(temp.path()).unwrap(), ["master", "private"]);
      assert!(list.find_set("SOCKit").unwrap().is_some());
      assert!(list.find_set("Internal").unwrap().is_some());
    }

    #[test]
    fn empty_pod_directory_does_not_hide_later_repo() {
      let temp = TempDir::new().unwrap();
      fs::create_dir_all(temp.path().join("a").join("SOCKit")).unwrap();
      write_spec(
        &temp.path().join("b"),
        "SOCKit",
        "1.0",
        r#"{ "name": "SOCKit", "version": "1.0" }"#,
      );

      let list = SourceList::from_repos_dir(temp.path()).unwrap();
      let set = list.find_set("SOCKit").unwrap().unwrap();
      assert_eq!(set.versions(), vec![v("1.0")]);
    }

    #[test]
    fn missing_repos_directory_is_empty() {
      let temp = TempDir::new().unwrap();
      let list = SourceList::from_repos_dir(&temp.path().join("absent")).unwrap();
      assert!(list.is_empty());
      assert!(SourceList::repo_names(&temp.path().join("absent")).unwrap().is_empty());
    }
  }
}
