//! Conformance harness for toolchains with interpreted and compiled modes
//!
//! This library discovers fixture programs with their expected output, runs
//! them through an external toolchain, and reports exact-match verdicts.

pub mod cli;
pub mod commands;
pub mod common;
pub mod harness;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use harness::{RunMode, RunSummary, TestCase, Verdict};
