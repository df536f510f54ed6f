//! CLI argument definitions
//!
//! Defines the clap arguments for the conformance CLI.

use clap::Args;
use std::path::PathBuf;

use crate::harness::RunMode;

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Skip rebuilding the toolchain before running
    #[arg(long, alias = "no-compile")]
    pub no_build: bool,

    /// Only list the selected cases, do not execute them
    #[arg(long)]
    pub dry_run: bool,

    /// Regex matched against the start of each case name
    #[arg(long)]
    pub filter: Option<String>,

    /// Fixture directory (overrides the config file)
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Execution mode to run; may be repeated (default: all modes)
    #[arg(long = "mode", value_enum)]
    pub modes: Vec<RunMode>,

    /// Per-case timeout in seconds, 0 to disable (overrides the config file)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Configuration file (default: ./conformance.toml, then the user config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}
