//! Output comparison and result reporting

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use super::invoker::ExecutionResult;
use super::mode::RunMode;
use crate::common::error::describe_exit_code;
use crate::common::{Error, Result};

/// Outcome of a single (mode, case) execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Ok,
    Fail {
        expected: String,
        actual: String,
    },
    /// The toolchain exited non-zero; fatal for the run
    Crashed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The toolchain did not finish in time; fatal for the run
    TimedOut {
        secs: u64,
    },
    /// The toolchain could not be started at all; fatal for the run
    LaunchFailed {
        error: String,
    },
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Verdict::Ok)
    }

    /// Whether this verdict stops the run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Verdict::Crashed { .. } | Verdict::TimedOut { .. } | Verdict::LaunchFailed { .. }
        )
    }
}

/// Compare a toolchain result against the expected output
///
/// Stdout must match byte for byte; nothing is trimmed or normalized.
pub fn compare(result: &ExecutionResult, expected: &str) -> Verdict {
    if !result.success() {
        return Verdict::Crashed {
            exit_code: result.exit_code,
            stdout: String::from_utf8_lossy(&result.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        };
    }

    if result.stdout == expected.as_bytes() {
        Verdict::Ok
    } else {
        Verdict::Fail {
            expected: expected.to_string(),
            actual: String::from_utf8_lossy(&result.stdout).into_owned(),
        }
    }
}

/// Recorded verdict for one case in one mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    pub mode: RunMode,
    pub name: String,
    pub verdict: Verdict,
    pub elapsed_ms: u64,
}

impl CaseOutcome {
    /// The error this outcome represents, if it is not a pass
    pub fn error(&self) -> Option<Error> {
        let case = self.name.clone();
        let mode = self.mode;
        match &self.verdict {
            Verdict::Ok => None,
            Verdict::Fail { .. } => Some(Error::OutputMismatch { case, mode }),
            Verdict::Crashed { exit_code, .. } => Some(Error::ToolchainCrash {
                case,
                mode,
                code: describe_exit_code(*exit_code),
            }),
            Verdict::TimedOut { secs } => Some(Error::ToolchainTimeout {
                case,
                mode,
                secs: *secs,
            }),
            Verdict::LaunchFailed { error } => Some(Error::ToolchainLaunch {
                case,
                mode,
                error: error.clone(),
            }),
        }
    }
}

/// Aggregate result of one harness run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Names of the cases selected after filtering
    pub selected: Vec<String>,
    /// Verdicts in execution order
    pub outcomes: Vec<CaseOutcome>,
    pub dry_run: bool,
    /// Set when a fatal verdict stopped the run early
    pub aborted: bool,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.verdict.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// True when every executed case passed and nothing aborted the run
    pub fn success(&self) -> bool {
        !self.aborted && self.failed() == 0
    }

    /// The fatal outcome that aborted the run, if any
    pub fn fatal_error(&self) -> Option<Error> {
        self.outcomes
            .iter()
            .find(|o| o.verdict.is_fatal())
            .and_then(CaseOutcome::error)
    }

    /// Why the run failed: the fatal outcome if any, else the first mismatch
    pub fn error(&self) -> Option<Error> {
        self.fatal_error().or_else(|| {
            self.outcomes
                .iter()
                .find(|o| !o.verdict.is_ok())
                .and_then(CaseOutcome::error)
        })
    }

    /// Write the summary as pretty JSON, creating parent directories
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Human-readable progress and verdict output
pub struct Reporter {
    out: Box<dyn Write + Send>,
}

impl Reporter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn mode_started(&mut self, mode: RunMode) -> io::Result<()> {
        writeln!(self.out, "{}", format!("Running {} tests", mode.label()).bold())
    }

    /// Announce a rebuild that a dry run does not perform
    pub fn dry_run_build(&mut self, command: &str) -> io::Result<()> {
        writeln!(self.out, "Compiling: {command} (skipped, dry run)")
    }

    pub fn dry_run_case(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "{name}")
    }

    pub fn outcome(&mut self, outcome: &CaseOutcome) -> io::Result<()> {
        let name = &outcome.name;
        match &outcome.verdict {
            Verdict::Ok => writeln!(self.out, "{} {}", "[OK]".green(), name),
            Verdict::Fail { expected, actual } => {
                writeln!(self.out, "{} {}", "[FAIL]".red(), name)?;
                writeln!(self.out, "Expected:\n{expected}")?;
                writeln!(self.out, "Got:\n{actual}")
            }
            Verdict::Crashed {
                exit_code,
                stdout,
                stderr,
            } => {
                writeln!(
                    self.out,
                    "{}",
                    format!(
                        "Test {} failed with error code {}",
                        name,
                        describe_exit_code(*exit_code)
                    )
                    .red()
                    .bold()
                )?;
                writeln!(self.out, "{stdout}")?;
                writeln!(self.out, "{stderr}")
            }
            Verdict::TimedOut { secs } => writeln!(
                self.out,
                "{}",
                format!("Test {name} timed out after {secs}s").red().bold()
            ),
            Verdict::LaunchFailed { error } => writeln!(
                self.out,
                "{}",
                format!("Test {name} could not be launched: {error}").red().bold()
            ),
        }
    }

    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        if summary.dry_run {
            return writeln!(self.out, "{} cases selected", summary.selected.len());
        }

        let line = format!("{} passed, {} failed", summary.passed(), summary.failed());
        if summary.success() {
            writeln!(self.out, "\n{}", line.green().bold())?;
        } else {
            writeln!(self.out, "\n{}", line.red().bold())?;
        }
        if summary.aborted {
            writeln!(self.out, "{}", "Run aborted after a toolchain failure".red())?;
        }
        self.out.flush()
    }
}
