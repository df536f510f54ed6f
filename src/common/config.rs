//! Configuration file handling

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::paths::config_candidates;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// How the toolchain under test is launched
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// The rebuild step run before discovery
    #[serde(default)]
    pub build: BuildConfig,

    /// Fixture directory layout
    #[serde(default)]
    pub fixtures: FixtureLayout,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// How the subcommand and program path are handed to the toolchain
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStyle {
    /// `<program> <args..> <subcommand> <input>`
    Separate,
    /// `<program> <args..> <prefix><subcommand> <input>` as one argument
    Joined,
}

/// Configuration for the toolchain under test
#[derive(Debug, Deserialize, Clone)]
pub struct ToolchainConfig {
    /// Entry point; bare names are looked up in PATH
    #[serde(default = "default_toolchain_program")]
    pub program: PathBuf,

    /// Arguments placed before the subcommand
    #[serde(default = "default_toolchain_args")]
    pub args: Vec<String>,

    #[serde(default = "default_argument_style")]
    pub argument_style: ArgumentStyle,

    /// Prefix of the single joined argument (joined style only)
    #[serde(default = "default_joined_prefix")]
    pub joined_prefix: String,

    /// Environment overrides for the toolchain process
    #[serde(default = "default_toolchain_env")]
    pub env: BTreeMap<String, String>,

    /// Working directory for the toolchain process
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: default_toolchain_program(),
            args: default_toolchain_args(),
            argument_style: default_argument_style(),
            joined_prefix: default_joined_prefix(),
            env: default_toolchain_env(),
            working_dir: None,
        }
    }
}

fn default_toolchain_program() -> PathBuf {
    PathBuf::from("mvn")
}

fn default_toolchain_args() -> Vec<String> {
    vec![
        "-q".to_string(),
        "exec:java".to_string(),
        "-Dexec.mainClass=App".to_string(),
    ]
}

fn default_argument_style() -> ArgumentStyle {
    ArgumentStyle::Joined
}

fn default_joined_prefix() -> String {
    "-Dexec.args=".to_string()
}

fn default_toolchain_env() -> BTreeMap<String, String> {
    // Enables the toolchain's internal assertion checks
    BTreeMap::from([("MAVEN_OPTS".to_string(), "-ea".to_string())])
}

/// Configuration for the rebuild step
#[derive(Debug, Deserialize, Clone)]
pub struct BuildConfig {
    #[serde(default = "default_build_program")]
    pub program: PathBuf,

    #[serde(default = "default_build_args")]
    pub args: Vec<String>,

    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_build_program(),
            args: default_build_args(),
            working_dir: None,
        }
    }
}

fn default_build_program() -> PathBuf {
    PathBuf::from("mvn")
}

fn default_build_args() -> Vec<String> {
    vec![
        "javacc:javacc".to_string(),
        "compile".to_string(),
        "package".to_string(),
    ]
}

/// Where fixtures live and how program/output pairs are named
#[derive(Debug, Deserialize, Clone)]
pub struct FixtureLayout {
    #[serde(default = "default_fixture_dir")]
    pub dir: PathBuf,

    /// Extension of program files, without the dot
    #[serde(default = "default_program_ext")]
    pub program_ext: String,

    /// Extension of expected-output files, without the dot
    #[serde(default = "default_output_ext")]
    pub output_ext: String,
}

impl Default for FixtureLayout {
    fn default() -> Self {
        Self {
            dir: default_fixture_dir(),
            program_ext: default_program_ext(),
            output_ext: default_output_ext(),
        }
    }
}

fn default_fixture_dir() -> PathBuf {
    PathBuf::from("tests")
}
fn default_program_ext() -> String {
    "calc".to_string()
}
fn default_output_ext() -> String {
    "out".to_string()
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct Timeouts {
    /// Per-case toolchain timeout; 0 disables it
    #[serde(default = "default_case_timeout")]
    pub case_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            case_secs: default_case_timeout(),
        }
    }
}

fn default_case_timeout() -> u64 {
    120
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the first existing candidate
    /// file is used, falling back to defaults when none exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        for candidate in config_candidates() {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Case timeout, `None` when disabled
    pub fn case_timeout(&self) -> Option<u64> {
        match self.timeouts.case_secs {
            0 => None,
            secs => Some(secs),
        }
    }
}
