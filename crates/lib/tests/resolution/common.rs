//! Fixture spec repositories written to a temporary directory.

use std::fs;
use std::path::Path;

use podres_lib::consts::PODSPEC_EXTENSION;
use podres_lib::{Resolver, Sandbox, SourceList};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Write one specification into `repo` at its `<Name>/<version>/` location.
pub fn write_spec(repo: &Path, spec: Value) {
  let name = spec["name"].as_str().expect("spec name");
  let version = spec["version"].as_str().expect("spec version");
  let dir = repo.join(name).join(version);
  fs::create_dir_all(&dir).unwrap();
  fs::write(
    dir.join(format!("{name}{PODSPEC_EXTENSION}")),
    serde_json::to_string_pretty(&spec).unwrap(),
  )
  .unwrap();
}

fn leaf(repo: &Path, name: &str, version: &str) {
  write_spec(repo, json!({ "name": name, "version": version }));
}

/// A `repos/` directory holding a `master` repository.
pub fn fixture_repos() -> TempDir {
  let temp = TempDir::new().unwrap();
  let master = temp.path().join("master");

  for version in ["1.0.0", "1.0.1"] {
    write_spec(
      &master,
      json!({
        "name": "BlocksKit",
        "version": version,
        "dependencies": ["A2DynamicDelegate"]
      }),
    );
  }
  leaf(&master, "A2DynamicDelegate", "1.0");

  write_spec(
    &master,
    json!({
      "name": "RestKit",
      "version": "0.10.0",
      "platforms": [{ "name": "ios", "deployment_target": "4.0" }, { "name": "osx", "deployment_target": "10.7" }],
      "subspecs": [
        {
          "name": "Network",
          "dependencies": [
            "SOCKit",
            "FileMD5Hash",
            "cocoa-oauth",
            { "name": "LibComponentLogging-NSLog", "requirement": ">= 1.0.0" }
          ]
        },
        { "name": "UI", "platforms": [{ "name": "ios" }], "dependencies": ["UDTableView"] },
        {
          "name": "ObjectMapping",
          "dependencies": ["ISO8601DateFormatter"],
          "subspecs": [
            { "name": "JSON", "dependencies": [{ "name": "JSONKit", "requirement": "~> 1.4" }] },
            { "name": "XML", "dependencies": ["XMLReader"] },
            { "name": "CoreData" }
          ]
        }
      ]
    }),
  );
  write_spec(
    &master,
    json!({
      "name": "RestKit",
      "version": "0.9.3",
      "dependencies": ["LibComponentLogging-NSLog"]
    }),
  );

  write_spec(
    &master,
    json!({
      "name": "LibComponentLogging-NSLog",
      "version": "1.0.2",
      "dependencies": [{ "name": "LibComponentLogging-Core", "requirement": ">= 1.1.4" }]
    }),
  );
  leaf(&master, "LibComponentLogging-Core", "1.1.4");
  leaf(&master, "LibComponentLogging-Core", "1.1.5");
  leaf(&master, "SOCKit", "1.0");
  leaf(&master, "FileMD5Hash", "0.0.1");
  leaf(&master, "cocoa-oauth", "0.0.1");
  leaf(&master, "UDTableView", "0.0.1");
  leaf(&master, "JSONKit", "1.4");
  leaf(&master, "ISO8601DateFormatter", "0.6");
  leaf(&master, "XMLReader", "0.0.1");

  temp
}

/// A resolver reading every repository inside `repos`.
pub fn resolver_for(repos: &Path) -> Resolver {
  let source = SourceList::from_repos_dir(repos).unwrap();
  Resolver::new(source, Sandbox::new(repos.join("Pods")))
}
