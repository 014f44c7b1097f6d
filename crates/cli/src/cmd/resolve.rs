//! Implementation of the `podres resolve` command.
//!
//! Loads a JSON podfile, resolves it against the configured spec repositories
//! and prints each target's specifications.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tracing::{debug, info};

use podres_lib::{Config, Podfile, RepoSource, Resolution, Resolver, Sandbox, SourceList};

use crate::output::{OutputFormat, format_duration, plural, print_error, print_info, print_json, print_success, symbols};

#[derive(Serialize)]
struct SpecReport {
  name: String,
  version: String,
}

#[derive(Serialize)]
struct TargetReport {
  name: String,
  platform: String,
  specs: Vec<SpecReport>,
}

#[derive(Serialize)]
struct ResolveReport {
  podfile: PathBuf,
  targets: Vec<TargetReport>,
  cached_sets: Vec<String>,
}

/// Execute the resolve command.
///
/// `repos` overrides the configured repositories directory; each entry is a
/// single spec repository, searched in the given order.
pub fn cmd_resolve(podfile: &Path, repos: &[PathBuf], output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let config = Config::load().context("Failed to load configuration")?;

  let podfile_path = dunce::canonicalize(podfile).unwrap_or_else(|_| podfile.to_path_buf());
  let podfile = Podfile::load(&podfile_path).context("Failed to load podfile")?;
  debug!(podfile = %podfile_path.display(), targets = podfile.targets.len(), "loaded podfile");

  let source = if repos.is_empty() {
    SourceList::from_repos_dir(&config.repos_dir)
      .with_context(|| format!("Failed to read repositories in {}", config.repos_dir.display()))?
  } else {
    repos
      .iter()
      .fold(SourceList::new(), |list, repo| list.with(RepoSource::new(repo)))
  };
  debug!(sources = source.len(), "configured spec repositories");

  let resolver = Resolver::new(source, Sandbox::new(&config.sandbox_root));
  let resolution = match resolver.resolve(&podfile) {
    Ok(resolution) => resolution,
    Err(e) if e.is_informative() => {
      debug!(error = %e, "resolution failed");
      print_error(&e.to_string());
      std::process::exit(1);
    }
    Err(e) => return Err(e).context("Failed to resolve podfile"),
  };

  info!(
    targets = resolution.len(),
    cached_sets = resolver.cached_sets().len(),
    "resolved podfile"
  );

  if output.is_json() {
    let report = ResolveReport {
      podfile: podfile_path,
      targets: target_reports(&resolution),
      cached_sets: resolver.cached_sets().into_keys().collect(),
    };
    print_json(&report)?;
    return Ok(());
  }

  for target in resolution.iter() {
    print_info(&format!("Target {} ({})", target.name, target.platform));
    for spec in &target.specs {
      println!(
        "  {} {} {}",
        symbols::ADD.if_supports_color(Stream::Stdout, |s| s.green()),
        spec.name(),
        format!("({})", spec.version()).if_supports_color(Stream::Stdout, |s| s.dimmed())
      );
    }
  }

  let total: usize = resolution.iter().map(|t| t.specs.len()).sum();
  print_success(&format!(
    "Resolved {} for {} in {}",
    plural(total, "specification"),
    plural(resolution.len(), "target"),
    format_duration(start.elapsed())
  ));

  Ok(())
}

fn target_reports(resolution: &Resolution) -> Vec<TargetReport> {
  resolution
    .iter()
    .map(|target| TargetReport {
      name: target.name.clone(),
      platform: target.platform.to_string(),
      specs: target
        .specs
        .iter()
        .map(|spec| SpecReport {
          name: spec.name().to_string(),
          version: spec.version().to_string(),
        })
        .collect(),
    })
    .collect()
}
