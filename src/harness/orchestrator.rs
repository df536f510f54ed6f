//! Run orchestration
//!
//! Sequences a run: rebuild, discover, filter, then every selected case in
//! every requested mode. Cases execute one at a time; the first crash or
//! timeout aborts everything that has not run yet.

use std::path::PathBuf;

use super::build::BuildStep;
use super::filter::CaseFilter;
use super::fixture::{discover, TestCase};
use super::invoker::Toolchain;
use super::mode::{normalize_modes, RunMode};
use super::report::{compare, CaseOutcome, Reporter, RunSummary, Verdict};
use crate::common::config::FixtureLayout;
use crate::common::{Error, Result};

/// Options for one harness run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run the build step before discovery
    pub build: bool,
    /// List the selected cases without executing them
    pub dry_run: bool,
    /// Start-anchored pattern over case names
    pub filter: Option<String>,
    pub fixture_dir: PathBuf,
    pub layout: FixtureLayout,
    /// Requested modes; empty means all
    pub modes: Vec<RunMode>,
}

impl Default for RunOptions {
    fn default() -> Self {
        let layout = FixtureLayout::default();
        Self {
            build: true,
            dry_run: false,
            filter: None,
            fixture_dir: layout.dir.clone(),
            layout,
            modes: Vec::new(),
        }
    }
}

/// Drives a run against a toolchain and a build step
pub struct Harness {
    toolchain: Box<dyn Toolchain>,
    build: Box<dyn BuildStep>,
    reporter: Reporter,
}

impl Harness {
    pub fn new(toolchain: Box<dyn Toolchain>, build: Box<dyn BuildStep>, reporter: Reporter) -> Self {
        Self {
            toolchain,
            build,
            reporter,
        }
    }

    /// Execute a full run
    ///
    /// Fixture, filter and build problems are returned as errors. Case
    /// verdicts, including fatal ones, are recorded in the summary.
    pub async fn run(&mut self, options: &RunOptions) -> Result<RunSummary> {
        let filter = CaseFilter::new(options.filter.as_deref())?;

        if options.build {
            if options.dry_run {
                self.reporter.dry_run_build(&self.build.describe())?;
            } else {
                self.build.rebuild().await?;
            }
        }

        let cases = filter.apply(discover(&options.fixture_dir, &options.layout)?);
        tracing::info!("Selected {} test cases", cases.len());

        let mut summary = RunSummary {
            selected: cases.iter().map(|c| c.name.clone()).collect(),
            dry_run: options.dry_run,
            ..RunSummary::default()
        };

        if options.dry_run {
            for name in &summary.selected {
                self.reporter.dry_run_case(name)?;
            }
            self.reporter.summary(&summary)?;
            return Ok(summary);
        }

        'modes: for mode in normalize_modes(&options.modes) {
            self.reporter.mode_started(mode)?;

            for case in &cases {
                let outcome = self.execute(mode, case).await;
                self.reporter.outcome(&outcome)?;

                let fatal = outcome.verdict.is_fatal();
                summary.outcomes.push(outcome);

                if fatal {
                    tracing::error!(mode = %mode, case = %case.name, "Aborting run after toolchain failure");
                    summary.aborted = true;
                    break 'modes;
                }
            }
        }

        self.reporter.summary(&summary)?;
        Ok(summary)
    }

    /// Run one case; every toolchain failure becomes a verdict
    async fn execute(&self, mode: RunMode, case: &TestCase) -> CaseOutcome {
        let (verdict, elapsed_ms) = match self.toolchain.invoke(mode, case).await {
            Ok(result) => (
                compare(&result, &case.expected_output),
                result.elapsed.as_millis() as u64,
            ),
            Err(Error::ToolchainTimeout { secs, .. }) => (Verdict::TimedOut { secs }, secs * 1000),
            Err(e) => {
                tracing::error!(mode = %mode, case = %case.name, "Toolchain launch failed: {}", e);
                (
                    Verdict::LaunchFailed {
                        error: e.to_string(),
                    },
                    0,
                )
            }
        };

        CaseOutcome {
            mode,
            name: case.name.clone(),
            verdict,
            elapsed_ms,
        }
    }
}
