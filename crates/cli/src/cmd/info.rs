use anyhow::{Context, Result};
use serde_json::json;

use podres_lib::platform::paths::{cache_dir, data_dir};
use podres_lib::{Config, SourceList};

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let config = Config::load().context("Failed to load configuration")?;

  let repos = SourceList::repo_names(&config.repos_dir)
    .with_context(|| format!("Failed to list repositories in {}", config.repos_dir.display()))?;

  if output.is_json() {
    return print_json(&json!({
      "version": env!("CARGO_PKG_VERSION"),
      "config_file": Config::file_path(),
      "repos_dir": config.repos_dir,
      "sandbox": config.sandbox_root,
      "data_dir": data_dir(),
      "cache_dir": cache_dir(),
      "repos": repos,
    }));
  }

  println!("podres v{}", env!("CARGO_PKG_VERSION"));
  print_stat("Config file", &Config::file_path().display().to_string());
  print_stat("Repositories", &config.repos_dir.display().to_string());
  print_stat("Sandbox", &config.sandbox_root.display().to_string());
  print_stat("Data", &data_dir().display().to_string());
  print_stat("Cache", &cache_dir().display().to_string());
  if repos.is_empty() {
    print_stat("Sources", "none");
  } else {
    print_stat("Sources", &repos.join(", "));
  }

  Ok(())
}
