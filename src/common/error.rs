//! Error types for the conformance harness
//!
//! Every message carries enough context (paths, case names, exit codes) to
//! diagnose a failure without re-running the harness.

use std::io;
use std::path::Path;
use thiserror::Error;

use crate::harness::RunMode;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the conformance harness
#[derive(Error, Debug)]
pub enum Error {
    // === Fixture Errors ===
    #[error("Fixture directory '{0}' not found")]
    FixtureDirNotFound(String),

    #[error("Program '{program}' has no expected output fixture (looked for '{expected}')")]
    MissingFixture { program: String, expected: String },

    // === Filter Errors ===
    #[error("Invalid filter pattern '{pattern}': {reason}")]
    FilterSyntax { pattern: String, reason: String },

    // === Build Errors ===
    #[error("Build step '{command}' failed with exit code {code}")]
    BuildFailed { command: String, code: String },

    #[error("Failed to start build step '{command}': {error}")]
    BuildSpawn { command: String, error: String },

    // === Toolchain Errors ===
    #[error("Toolchain '{0}' not found in PATH")]
    ToolchainNotFound(String),

    #[error("Failed to start toolchain '{program}': {error}")]
    ToolchainSpawn { program: String, error: String },

    #[error("Test {case} ({mode}) failed with error code {code}")]
    ToolchainCrash {
        case: String,
        mode: RunMode,
        code: String,
    },

    #[error("Test {case} ({mode}) timed out after {secs} seconds")]
    ToolchainTimeout {
        case: String,
        mode: RunMode,
        secs: u64,
    },

    #[error("Test {case} ({mode}) could not be launched: {error}")]
    ToolchainLaunch {
        case: String,
        mode: RunMode,
        error: String,
    },

    #[error("Output of {case} ({mode}) did not match the expected fixture")]
    OutputMismatch { case: String, mode: RunMode },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file read error for `path`
    pub fn file_read(path: &Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a missing fixture error for a program and its expected pair
    pub fn missing_fixture(program: &Path, expected: &Path) -> Self {
        Self::MissingFixture {
            program: program.display().to_string(),
            expected: expected.display().to_string(),
        }
    }
}

/// Render an optional exit code; `None` means the process was killed by a signal
pub fn describe_exit_code(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}
