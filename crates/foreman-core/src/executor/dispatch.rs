//! Per-type step dispatch.
//!
//! File and research steps are phrased as natural-language instructions
//! and delegated to the external step executor; command steps run
//! through the shell runner; review and other steps complete locally
//! without delegation.

use std::path::Path;

use super::command::{run_command, COMMAND_TIMEOUT};
use super::PlanExecutor;
use crate::error::{ForemanError, Result};
use crate::models::{PlanStep, StepType};

/// Captured step output is truncated to this many bytes.
pub(crate) const MAX_OUTPUT_LEN: usize = 4000;

impl PlanExecutor {
    /// Performs a step's own action (substeps are the caller's concern)
    /// and returns its captured output text.
    pub(crate) async fn run_step_action(
        &self,
        step: &PlanStep,
        workspace_root: &Path,
    ) -> Result<String> {
        match step.step_type {
            StepType::FileEdit | StepType::FileCreate | StepType::FileDelete => {
                let instruction = file_instruction(step)?;
                self.delegate(&instruction).await
            }
            StepType::Command => {
                let command = step.target.as_deref().ok_or_else(|| {
                    ForemanError::step_failed("command step has no command text")
                })?;
                run_command(command, workspace_root, COMMAND_TIMEOUT).await
            }
            StepType::Research => {
                let instruction = match &step.description {
                    Some(description) => format!(
                        "Research task: {}. {description} Provide a brief summary of findings.",
                        step.title
                    ),
                    None => format!(
                        "Research task: {}. Provide a brief summary of findings.",
                        step.title
                    ),
                };
                self.delegate(&instruction).await
            }
            StepType::Review => Ok(format!("Checkpoint reached: {}", step.title)),
            StepType::Other => Ok(format!("Completed: {}", step.title)),
        }
    }

    async fn delegate(&self, instruction: &str) -> Result<String> {
        let executor = self
            .step_executor
            .as_ref()
            .ok_or_else(|| ForemanError::step_failed("no step executor configured"))?;
        executor
            .execute(instruction)
            .await
            .map_err(|e| ForemanError::step_failed(e.to_string()))
    }
}

fn file_instruction(step: &PlanStep) -> Result<String> {
    let target = step
        .target
        .as_deref()
        .ok_or_else(|| ForemanError::step_failed("file step has no target path"))?;
    let detail = step.description.as_deref().unwrap_or(&step.title);
    Ok(match step.step_type {
        StepType::FileEdit => {
            format!("Edit the file at {target} to accomplish the following: {detail}")
        }
        StepType::FileCreate => {
            format!("Create a new file at {target} with the following content or purpose: {detail}")
        }
        _ => format!("Delete the file at {target}."),
    })
}

/// Truncates captured output at a char boundary, appending a marker
/// when anything was cut.
pub(crate) fn truncate_output(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.len() <= MAX_OUTPUT_LEN {
        return trimmed.to_string();
    }
    let mut end = MAX_OUTPUT_LEN;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &trimmed[..end])
}
