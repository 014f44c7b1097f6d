/// Application name used for per-user directories
pub const APP_NAME: &str = "podres";

/// Separator between a pod name and its subspec path (`RestKit/ObjectMapping/XML`)
pub const SUBSPEC_SEPARATOR: char = '/';

/// File name suffix of specifications inside a spec repository
pub const PODSPEC_EXTENSION: &str = ".podspec.json";
