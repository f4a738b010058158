//! Shell command runner for command-type steps.

use std::path::Path;
use std::time::Duration;

use tokio::process::Command;

use crate::error::{ForemanError, Result};

/// Wall-clock limit for a single command step.
pub(crate) const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs `command` through the platform shell in `working_dir`, capturing
/// stdout. A non-zero exit, spawn failure, or timeout is a step failure
/// carrying the underlying message.
pub(crate) async fn run_command(
    command: &str,
    working_dir: &Path,
    timeout: Duration,
) -> Result<String> {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    };
    cmd.current_dir(working_dir).kill_on_drop(true);

    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| {
            ForemanError::step_failed(format!(
                "command timed out after {}s: {command}",
                timeout.as_secs()
            ))
        })?
        .map_err(|e| ForemanError::step_failed(format!("failed to run command: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ForemanError::step_failed(format!(
            "command exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
