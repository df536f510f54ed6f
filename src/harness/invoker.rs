//! Toolchain invocation
//!
//! Launches the toolchain under test once per (mode, case) pair and captures
//! everything it prints.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use super::fixture::TestCase;
use super::mode::RunMode;
use crate::common::config::{ArgumentStyle, ToolchainConfig};
use crate::common::{Error, Result};

/// Captured outcome of one toolchain process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub elapsed: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Something that can execute a case in a given mode
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Run `case` in `mode` to completion
    async fn invoke(&self, mode: RunMode, case: &TestCase) -> Result<ExecutionResult>;
}

/// Runs the toolchain as an external process
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    program: PathBuf,
    args: Vec<String>,
    style: ArgumentStyle,
    joined_prefix: String,
    env: BTreeMap<String, String>,
    working_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

impl ProcessToolchain {
    /// Build an invoker from configuration
    ///
    /// The program is resolved through PATH on each invocation, so a run that
    /// never executes a case does not need the toolchain installed.
    pub fn from_config(config: &ToolchainConfig, timeout_secs: Option<u64>) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            style: config.argument_style,
            joined_prefix: config.joined_prefix.clone(),
            env: config.env.clone(),
            working_dir: config.working_dir.clone(),
            timeout_secs,
        }
    }

    /// Full argument list for one invocation
    pub fn arguments(&self, mode: RunMode, input: &Path) -> Vec<OsString> {
        let mut argv: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        match self.style {
            ArgumentStyle::Separate => {
                argv.push(mode.subcommand().into());
                argv.push(input.as_os_str().to_owned());
            }
            ArgumentStyle::Joined => {
                let mut joined = OsString::from(&self.joined_prefix);
                joined.push(mode.subcommand());
                joined.push(" ");
                joined.push(input.as_os_str());
                argv.push(joined);
            }
        }
        argv
    }

    /// Input path as seen from the toolchain's working directory
    fn input_path(&self, case: &TestCase) -> Result<PathBuf> {
        if self.working_dir.is_some() && case.input.is_relative() {
            Ok(std::env::current_dir()?.join(&case.input))
        } else {
            Ok(case.input.clone())
        }
    }

    fn command(&self, program: &Path, mode: RunMode, input: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(self.arguments(mode, input))
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl Toolchain for ProcessToolchain {
    async fn invoke(&self, mode: RunMode, case: &TestCase) -> Result<ExecutionResult> {
        let program = resolve_program(&self.program)?;
        let input = self.input_path(case)?;
        let mut cmd = self.command(&program, mode, &input);

        tracing::debug!(
            mode = %mode,
            case = %case.name,
            "Spawning {} {:?}",
            program.display(),
            self.arguments(mode, &input)
        );

        let started = Instant::now();
        let spawn_error = |e: std::io::Error| Error::ToolchainSpawn {
            program: program.display().to_string(),
            error: e.to_string(),
        };

        // Dropping the output future on timeout kills the child (kill_on_drop)
        let output = match self.timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), cmd.output()).await {
                Ok(output) => output.map_err(spawn_error)?,
                Err(_) => {
                    tracing::warn!(case = %case.name, "Toolchain timed out after {}s", secs);
                    return Err(Error::ToolchainTimeout {
                        case: case.name.clone(),
                        mode,
                        secs,
                    });
                }
            },
            None => cmd.output().await.map_err(spawn_error)?,
        };

        let result = ExecutionResult {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
            elapsed: started.elapsed(),
        };

        tracing::debug!(
            case = %case.name,
            exit_code = ?result.exit_code,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Toolchain finished"
        );

        Ok(result)
    }
}

/// Resolve a bare program name through PATH; paths are used as given
pub fn resolve_program(program: &Path) -> Result<PathBuf> {
    if program.components().count() > 1 {
        return Ok(program.to_path_buf());
    }
    which::which(program).map_err(|_| Error::ToolchainNotFound(program.display().to_string()))
}
