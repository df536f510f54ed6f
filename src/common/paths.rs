//! Configuration file locations
//!
//! A project-local `conformance.toml` takes precedence over the per-user
//! configuration file.

use std::path::PathBuf;

/// Name used for the per-user configuration directory
const APP_NAME: &str = "conformance";

/// File name of the project-local configuration
pub const LOCAL_CONFIG_FILE: &str = "conformance.toml";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/conformance/`
/// - macOS: `~/Library/Application Support/conformance/`
/// - Windows: `%APPDATA%\conformance\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the per-user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the project-local configuration file in the current directory
pub fn local_config_path() -> PathBuf {
    PathBuf::from(LOCAL_CONFIG_FILE)
}

/// Candidate configuration files, highest precedence first
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![local_config_path()];
    candidates.extend(user_config_path());
    candidates
}
