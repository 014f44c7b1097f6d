mod common;
mod repo_tests;
mod scenario_tests;
