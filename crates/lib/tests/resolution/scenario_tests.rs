//! End-to-end resolution against the fixture repository.

use podres_lib::{Dependency, Platform, PlatformName, Podfile, ResolveError, Resolution, Specification, TargetDefinition, Version};

use super::common::{fixture_repos, resolver_for};

fn v(s: &str) -> Version {
  Version::parse(s).unwrap()
}

fn podfile(platform: Platform, deps: &[&str]) -> Podfile {
  let target = deps
    .iter()
    .fold(TargetDefinition::new("default", platform), |t, d| {
      t.with_dependency(Dependency::named(*d))
    });
  Podfile::new().with_target(target)
}

fn sorted_names(resolution: &Resolution) -> Vec<String> {
  let mut names: Vec<_> = resolution.specs().map(|s| s.name().to_string()).collect();
  names.sort();
  names
}

mod blockskit {
  use super::*;

  #[test]
  fn caches_one_set_per_pod() {
    let repos = fixture_repos();
    let resolver = resolver_for(repos.path());
    resolver.resolve(&podfile(Platform::ios(), &["BlocksKit"])).unwrap();

    let cached = resolver.cached_sets();
    let names: Vec<_> = cached.keys().map(String::as_str).collect();
    assert_eq!(names, ["A2DynamicDelegate", "BlocksKit"]);
    assert_eq!(cached["BlocksKit"].versions(), vec![v("1.0.1"), v("1.0.0")]);
  }

  #[test]
  fn returns_every_needed_spec() {
    let repos = fixture_repos();
    let resolution = resolver_for(repos.path())
      .resolve(&podfile(Platform::ios(), &["BlocksKit"]))
      .unwrap();

    assert_eq!(sorted_names(&resolution), ["A2DynamicDelegate", "BlocksKit"]);
    let blockskit = resolution.specs().find(|s| s.name() == "BlocksKit").unwrap();
    assert_eq!(blockskit.version(), &v("1.0.1"));
  }

  #[test]
  fn resolves_on_every_platform() {
    let repos = fixture_repos();
    let resolver = resolver_for(repos.path());
    let mut podfile = podfile(Platform::ios(), &["BlocksKit"]);
    assert!(resolver.resolve(&podfile).is_ok());

    podfile.target_mut("default").unwrap().set_platform(Platform::osx());
    assert!(resolver.resolve(&podfile).is_ok());
  }
}

mod restkit {
  use super::*;

  #[test]
  fn explicit_subspecs_pull_only_their_closure() {
    let repos = fixture_repos();
    let resolution = resolver_for(repos.path())
      .resolve(&podfile(Platform::ios(), &["RestKit/Network", "RestKit/ObjectMapping/XML"]))
      .unwrap();

    assert_eq!(
      sorted_names(&resolution),
      [
        "FileMD5Hash",
        "LibComponentLogging-Core",
        "LibComponentLogging-NSLog",
        "RestKit/Network",
        "RestKit/ObjectMapping/XML",
        "SOCKit",
        "XMLReader",
        "cocoa-oauth",
      ]
    );
  }

  #[test]
  fn explicit_parent_subspec_pulls_its_children_but_not_siblings() {
    let repos = fixture_repos();
    let resolution = resolver_for(repos.path())
      .resolve(&podfile(Platform::ios(), &["RestKit/ObjectMapping"]))
      .unwrap();

    assert_eq!(
      sorted_names(&resolution),
      [
        "ISO8601DateFormatter",
        "JSONKit",
        "RestKit/ObjectMapping",
        "RestKit/ObjectMapping/CoreData",
        "RestKit/ObjectMapping/JSON",
        "RestKit/ObjectMapping/XML",
        "XMLReader",
      ]
    );
    let target = resolution.get("default").unwrap();
    assert!(!target.contains("RestKit"));
    assert!(!target.contains("RestKit/Network"));
    assert!(!target.contains("RestKit/UI"));
  }

  #[test]
  fn top_level_dependency_includes_every_subspec() {
    let repos = fixture_repos();
    let resolution = resolver_for(repos.path())
      .resolve(&podfile(Platform::ios(), &["RestKit"]))
      .unwrap();

    assert_eq!(
      sorted_names(&resolution),
      [
        "FileMD5Hash",
        "ISO8601DateFormatter",
        "JSONKit",
        "LibComponentLogging-Core",
        "LibComponentLogging-NSLog",
        "RestKit",
        "RestKit/Network",
        "RestKit/ObjectMapping",
        "RestKit/ObjectMapping/CoreData",
        "RestKit/ObjectMapping/JSON",
        "RestKit/ObjectMapping/XML",
        "RestKit/UI",
        "SOCKit",
        "UDTableView",
        "XMLReader",
        "cocoa-oauth",
      ]
    );
  }

  #[test]
  fn inline_main_subspec_limits_expansion() {
    let inline = Specification::new("RestKit", v("0.10.0"))
      .with_main_subspec("JSON")
      .with_subspec("JSON", |js| {
        js.with_dependency(Dependency::named("RestKit/Network"))
          .with_dependency(Dependency::named("RestKit/UI"))
          .with_dependency(Dependency::named("RestKit/ObjectMapping/JSON"))
          .with_dependency(Dependency::named("RestKit/ObjectMapping/CoreData"))
      })
      .with_subspec("Network", |s| s)
      .with_subspec("UI", |s| s)
      .with_subspec("ObjectMapping", |os| {
        os.with_subspec("JSON", |s| s)
          .with_subspec("XML", |s| s)
          .with_subspec("CoreData", |s| s)
      });

    let repos = fixture_repos();
    let resolver = resolver_for(repos.path());
    let podfile = Podfile::new()
      .with_target(TargetDefinition::new("default", Platform::ios()).with_dependency(Dependency::inline(inline)));
    let resolution = resolver.resolve(&podfile).unwrap();

    assert_eq!(
      sorted_names(&resolution),
      [
        "RestKit",
        "RestKit/JSON",
        "RestKit/Network",
        "RestKit/ObjectMapping/CoreData",
        "RestKit/ObjectMapping/JSON",
        "RestKit/UI",
      ]
    );
    // The repository's RestKit never entered the cache.
    assert_eq!(resolver.cached_sets()["RestKit"].versions(), vec![v("0.10.0")]);
    assert_eq!(resolver.cached_sets().len(), 1);
  }

  #[test]
  fn older_target_is_rejected() {
    let repos = fixture_repos();
    let target = Platform::with_target(PlatformName::Ios, v("3.2"));
    let err = resolver_for(repos.path())
      .resolve(&podfile(target, &["RestKit/Network"]))
      .unwrap_err();

    match &err {
      ResolveError::IncompatibleDeploymentTarget { spec, required, .. } => {
        assert_eq!(spec, "RestKit/Network");
        assert_eq!(required, &v("4.0"));
      }
      other => panic!("expected deployment target failure, got {other:?}"),
    }
    assert!(err.is_informative());
  }

  #[test]
  fn ios_only_subspec_rejects_osx() {
    let repos = fixture_repos();
    let err = resolver_for(repos.path())
      .resolve(&podfile(Platform::osx(), &["RestKit"]))
      .unwrap_err();
    assert!(matches!(&err, ResolveError::IncompatiblePlatform { spec, .. } if spec == "RestKit/UI"));
  }

  #[test]
  fn requirement_selects_older_version() {
    let repos = fixture_repos();
    let podfile = Podfile::new().with_target(
      TargetDefinition::new("legacy", Platform::ios())
        .with_dependency(Dependency::with_requirement("RestKit", "~> 0.9.0".parse().unwrap())),
    );
    let resolution = resolver_for(repos.path()).resolve(&podfile).unwrap();

    let legacy = resolution.get("legacy").unwrap();
    assert_eq!(
      legacy.spec_names(),
      ["RestKit", "LibComponentLogging-NSLog", "LibComponentLogging-Core"]
    );
    let core = legacy
      .specs
      .iter()
      .find(|s| s.name() == "LibComponentLogging-Core")
      .unwrap();
    assert_eq!(core.version(), &v("1.1.5"));
  }
}
