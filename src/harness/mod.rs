//! Conformance harness
//!
//! Discovers program/expected-output fixture pairs, runs each program through
//! the toolchain under test in every execution mode, and compares the printed
//! output byte for byte against the fixture.

pub mod build;
pub mod filter;
pub mod fixture;
pub mod invoker;
pub mod mode;
pub mod orchestrator;
pub mod report;

pub use build::{BuildStep, CommandBuild, SkipBuild};
pub use filter::CaseFilter;
pub use fixture::{discover, TestCase};
pub use invoker::{ExecutionResult, ProcessToolchain, Toolchain};
pub use mode::RunMode;
pub use orchestrator::{Harness, RunOptions};
pub use report::{compare, CaseOutcome, Reporter, RunSummary, Verdict};
