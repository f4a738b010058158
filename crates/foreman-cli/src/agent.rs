//! Subprocess-backed step executor.
//!
//! File and research steps need an external agent to do the actual
//! work. [`SubprocessAgent`] pipes each instruction to a user-supplied
//! shell command on stdin and treats the command's stdout as the step
//! output.

use std::process::Stdio;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use foreman_core::StepExecutor;
use log::debug;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub struct SubprocessAgent {
    command: String,
}

impl SubprocessAgent {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl StepExecutor for SubprocessAgent {
    async fn execute(&self, instruction: &str) -> Result<String> {
        debug!("delegating to agent: {}", self.command);

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn agent command: {}", self.command))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(instruction.as_bytes())
                .await
                .context("failed to write instruction to agent stdin")?;
            // Dropping stdin closes the pipe so the agent sees EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .context("failed to wait for agent command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "agent command exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
