//! Resolution through on-disk repositories and podfiles.

use std::fs;

use podres_lib::consts::PODSPEC_EXTENSION;
use podres_lib::{Podfile, ResolveError, Version};
use serde_json::json;

use super::common::{fixture_repos, resolver_for, write_spec};

#[test]
fn first_repository_owns_a_pod() {
  let repos = fixture_repos();
  // "private" sorts after "master"
  write_spec(
    &repos.path().join("private"),
    json!({ "name": "BlocksKit", "version": "9.0" }),
  );
  write_spec(&repos.path().join("private"), json!({ "name": "Internal", "version": "0.1" }));

  let podfile = Podfile::from_json(
    r#"{ "targets": [{ "name": "app", "platform": { "name": "ios" }, "dependencies": ["BlocksKit", "Internal"] }] }"#,
  )
  .unwrap();
  let resolution = resolver_for(repos.path()).resolve(&podfile).unwrap();

  let app = resolution.get("app").unwrap();
  assert_eq!(app.spec_names(), ["BlocksKit", "A2DynamicDelegate", "Internal"]);
  assert_eq!(app.specs[0].version(), &Version::parse("1.0.1").unwrap());
}

#[test]
fn podfile_on_disk_resolves_each_target() {
  let repos = fixture_repos();
  let path = repos.path().join("Podfile.json");
  fs::write(
    &path,
    r#"{
      "targets": [
        {
          "name": "app",
          "platform": { "name": "ios", "deployment_target": "5.0" },
          "dependencies": ["RestKit/Network", { "name": "JSONKit", "requirement": "~> 1.4" }]
        },
        {
          "name": "mac",
          "platform": { "name": "osx", "deployment_target": "10.8" },
          "dependencies": ["BlocksKit"]
        }
      ]
    }"#,
  )
  .unwrap();

  let podfile = Podfile::load(&path).unwrap();
  let resolution = resolver_for(repos.path()).resolve(&podfile).unwrap();
  assert_eq!(resolution.len(), 2);

  let app = resolution.get("app").unwrap();
  assert!(app.contains("RestKit/Network"));
  assert!(app.contains("JSONKit"));
  assert!(!app.contains("BlocksKit"));

  let map = resolution.into_map();
  assert_eq!(map["mac"].len(), 2);
}

#[test]
fn broken_spec_is_a_source_error() {
  let repos = fixture_repos();
  let dir = repos.path().join("master").join("Broken").join("1.0");
  fs::create_dir_all(&dir).unwrap();
  fs::write(dir.join(format!("Broken{PODSPEC_EXTENSION}")), "{ not json").unwrap();

  let podfile = Podfile::from_json(
    r#"{ "targets": [{ "name": "app", "platform": { "name": "ios" }, "dependencies": ["Broken"] }] }"#,
  )
  .unwrap();
  let err = resolver_for(repos.path()).resolve(&podfile).unwrap_err();

  assert!(matches!(err, ResolveError::Source(_)));
  assert!(!err.is_informative());
}

#[test]
fn unknown_pod_names_its_requester() {
  let repos = fixture_repos();
  let podfile = Podfile::from_json(
    r#"{ "targets": [{ "name": "app", "platform": { "name": "ios" }, "dependencies": ["Missing"] }] }"#,
  )
  .unwrap();
  let err = resolver_for(repos.path()).resolve(&podfile).unwrap_err();

  assert_eq!(
    err.to_string(),
    "unable to find a specification for 'Missing' (required by target 'app')"
  );
}
