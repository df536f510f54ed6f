//! Rebuild step run before discovery

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::common::config::BuildConfig;
use crate::common::error::describe_exit_code;
use crate::common::{Error, Result};

/// Produces or refreshes the toolchain under test
#[async_trait]
pub trait BuildStep: Send + Sync {
    /// Human-readable description, used in logs and dry runs
    fn describe(&self) -> String;

    async fn rebuild(&self) -> Result<()>;
}

/// Runs the configured build command with inherited stdio
#[derive(Debug, Clone)]
pub struct CommandBuild {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandBuild {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
        }
    }
}

#[async_trait]
impl BuildStep for CommandBuild {
    fn describe(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn rebuild(&self) -> Result<()> {
        tracing::info!("Rebuilding toolchain: {}", self.describe());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().await.map_err(|e| Error::BuildSpawn {
            command: self.describe(),
            error: e.to_string(),
        })?;

        if !status.success() {
            return Err(Error::BuildFailed {
                command: self.describe(),
                code: describe_exit_code(status.code()),
            });
        }

        Ok(())
    }
}

/// Build step that does nothing, for `--no-build`
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipBuild;

#[async_trait]
impl BuildStep for SkipBuild {
    fn describe(&self) -> String {
        "skipped".to_string()
    }

    async fn rebuild(&self) -> Result<()> {
        Ok(())
    }
}
