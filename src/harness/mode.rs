//! Execution modes of the toolchain under test

use serde::Serialize;
use std::fmt;

/// Which execution strategy the toolchain uses for a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Interpret the program directly
    Interpreted,
    /// Compile the program, then run the result
    Compiled,
}

impl RunMode {
    /// All modes in the order a full run executes them
    pub const ALL: [RunMode; 2] = [RunMode::Interpreted, RunMode::Compiled];

    /// Subcommand token passed to the toolchain
    pub fn subcommand(self) -> &'static str {
        match self {
            RunMode::Interpreted => "run",
            RunMode::Compiled => "crun",
        }
    }

    /// Upper-case label used in report headers
    pub fn label(self) -> &'static str {
        match self {
            RunMode::Interpreted => "INTERPRETED",
            RunMode::Compiled => "COMPILED",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Deduplicate requested modes and put them in canonical order
///
/// An empty request selects every mode.
pub fn normalize_modes(requested: &[RunMode]) -> Vec<RunMode> {
    if requested.is_empty() {
        return RunMode::ALL.to_vec();
    }
    RunMode::ALL
        .into_iter()
        .filter(|mode| requested.contains(mode))
        .collect()
}
