//! Runs the planned package manager commands

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use crate::plan::CommandStep;
use crate::{Result, ScaffoldError};

/// Executes one planned command
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `step` in `cwd` and wait for it; a non-zero exit is an error
    async fn run(&self, step: &CommandStep, cwd: &Path) -> Result<()>;
}

/// Spawns real processes, sharing this process's terminal
pub struct ProcessRunner;

impl ProcessRunner {
    fn command(argv: &[String]) -> Option<TokioCommand> {
        let (program, args) = argv.split_first()?;
        let command = if cfg!(windows) {
            // npm, npx and friends are .cmd shims on Windows
            let mut command = TokioCommand::new("cmd");
            command.arg("/C").arg(program).args(args);
            command
        } else {
            let mut command = TokioCommand::new(program);
            command.args(args);
            command
        };
        Some(command)
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, step: &CommandStep, cwd: &Path) -> Result<()> {
        let rendered = step.display();
        let mut command = Self::command(&step.argv).ok_or_else(|| ScaffoldError::CommandFailed {
            command: step.name.clone(),
            reason: "empty command".to_string(),
        })?;

        debug!(command = %rendered, cwd = %cwd.display(), "Spawning");
        let status = command
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ScaffoldError::CommandFailed {
                command: rendered.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(ScaffoldError::CommandFailed {
                command: rendered,
                reason: format!("exited with {status}"),
            });
        }

        info!(command = %rendered, "Command finished");
        Ok(())
    }
}

/// Records commands instead of running them
#[cfg(test)]
#[derive(Default)]
pub struct RecordingRunner {
    pub seen: std::sync::Mutex<Vec<String>>,
    /// Fail when a command with this label comes up
    pub fail_on: Option<String>,
}

#[cfg(test)]
#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, step: &CommandStep, _cwd: &Path) -> Result<()> {
        self.seen
            .lock()
            .map_err(|_| ScaffoldError::CommandFailed {
                command: step.display(),
                reason: "poisoned".to_string(),
            })?
            .push(step.display());
        if self.fail_on.as_deref() == Some(step.name.as_str()) {
            return Err(ScaffoldError::CommandFailed {
                command: step.display(),
                reason: "exited with exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}
