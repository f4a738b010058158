//! Step execution engine with pause/resume/cancel and approval gating.
//!
//! [`PlanExecutor`] runs a plan's steps strictly in order, delegating
//! the actual work per step type (see [`dispatch`]) and mutating step
//! and plan state as it goes. The loop suspends cooperatively at step
//! boundaries on the [`ExecutionHandle`]'s watch signal and, when
//! auto-approve is off, blocks on an approval gate until the step is
//! approved, skipped, or the run is cancelled.
//!
//! The executor owns no plan storage; the manager hands it a plan to
//! mutate and persists the outcome.

mod command;
mod controls;
mod dispatch;

pub use controls::ExecutionHandle;

use dispatch::truncate_output;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jiff::Timestamp;
use log::{debug, info};
use tokio::sync::{broadcast, watch};

use controls::RunSignal;

use crate::events::PlanEvent;
use crate::models::{
    ExecuteOptions, ExecutionResult, Plan, PlanStatus, PlanStep, StepStatus,
};

/// External collaborator that performs file and research work given a
/// natural-language instruction. The executor never inspects how the
/// work is done, only the final text output or failure.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(&self, instruction: &str) -> anyhow::Result<String>;
}

/// Simulated work delay per step in dry-run mode.
const DRY_RUN_DELAY: Duration = Duration::from_millis(25);

/// Outcome of one step subtree execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Completed,
    Failed,
    Cancelled,
}

/// How the approval gate resolved for a step.
enum GateOutcome {
    Approved,
    Skipped,
    Cancelled,
}

/// Runs a single plan's steps in order. One executor instance serves
/// one run; the manager constructs it per `execute_plan` call.
pub struct PlanExecutor {
    workspace_root: Option<PathBuf>,
    step_executor: Option<Arc<dyn StepExecutor>>,
    events: broadcast::Sender<PlanEvent>,
}

impl PlanExecutor {
    pub fn new(
        workspace_root: Option<PathBuf>,
        step_executor: Option<Arc<dyn StepExecutor>>,
        events: broadcast::Sender<PlanEvent>,
    ) -> Self {
        Self {
            workspace_root,
            step_executor,
            events,
        }
    }

    /// Executes the plan's steps in order, mutating step and plan state
    /// in place, and returns the run summary.
    ///
    /// Requires a workspace root; without one the run fails immediately
    /// with zero steps touched.
    pub async fn execute(
        &self,
        plan: &mut Plan,
        options: ExecuteOptions,
        handle: &ExecutionHandle,
    ) -> ExecutionResult {
        let started = Instant::now();
        let Some(workspace_root) = self.workspace_root.clone() else {
            return ExecutionResult::environment_failure(
                plan.id,
                "no workspace root configured for execution",
            );
        };
        let mut signal = handle.subscribe();

        info!(
            "executing plan {} ({} steps, dry_run={})",
            plan.id,
            plan.steps.len(),
            options.dry_run
        );
        plan.status = PlanStatus::Executing;
        plan.touch();

        let mut executed = 0usize;
        let mut failed = 0usize;
        let mut skipped = 0usize;
        let mut errors: Vec<String> = Vec::new();
        let mut cancelled = false;

        for index in 0..plan.steps.len() {
            if !wait_until_running(&mut signal).await {
                cancelled = true;
                break;
            }

            let step_id = plan.steps[index].id.clone();
            if handle.skip_requested(&step_id)
                && plan.steps[index].status == StepStatus::Pending
            {
                plan.steps[index].status = StepStatus::Skipped;
            }
            if plan.steps[index].status == StepStatus::Skipped {
                debug!("skipping step {step_id}");
                skipped += 1;
                continue;
            }
            if plan.steps[index].status != StepStatus::Pending {
                continue;
            }

            if !options.auto_approve {
                let _ = self
                    .events
                    .send(PlanEvent::ApprovalRequired(plan.steps[index].clone()));
                match wait_for_gate(handle, &mut signal, &step_id).await {
                    GateOutcome::Approved => {}
                    GateOutcome::Skipped => {
                        plan.steps[index].status = StepStatus::Skipped;
                        skipped += 1;
                        continue;
                    }
                    GateOutcome::Cancelled => {
                        cancelled = true;
                        break;
                    }
                }
            }

            let outcome = self
                .run_step_tree(
                    &mut plan.steps[index],
                    options,
                    handle,
                    &workspace_root,
                    &mut errors,
                )
                .await;
            match outcome {
                StepOutcome::Completed => {
                    executed += 1;
                    plan.metadata.completed_steps += 1;
                }
                StepOutcome::Failed => {
                    failed += 1;
                    plan.metadata.failed_steps += 1;
                    if !options.continue_on_error {
                        break;
                    }
                }
                StepOutcome::Cancelled => {
                    cancelled = true;
                    break;
                }
            }
        }

        if handle.is_cancelled() {
            cancelled = true;
        }

        plan.metadata.skipped_steps = skipped as u32;
        plan.status = if cancelled {
            PlanStatus::Cancelled
        } else if failed > 0 {
            PlanStatus::Failed
        } else {
            PlanStatus::Completed
        };
        plan.completed_at = Some(Timestamp::now());
        plan.touch();

        let result = ExecutionResult {
            plan_id: plan.id,
            success: failed == 0 && !cancelled,
            steps_executed: executed,
            steps_failed: failed,
            steps_skipped: skipped,
            duration: started.elapsed(),
            errors,
        };
        info!(
            "plan {} finished: {} ({} executed, {} failed, {} skipped)",
            plan.id,
            plan.status.as_str(),
            result.steps_executed,
            result.steps_failed,
            result.steps_skipped
        );
        let _ = self.events.send(PlanEvent::PlanComplete(result.clone()));
        result
    }

    /// Executes one step and then its substeps depth-first. A substep
    /// failure is recorded on the substep and in the error list but
    /// does not fail the parent; each substep run is independent.
    async fn run_step_tree(
        &self,
        step: &mut PlanStep,
        options: ExecuteOptions,
        handle: &ExecutionHandle,
        workspace_root: &Path,
        errors: &mut Vec<String>,
    ) -> StepOutcome {
        step.status = StepStatus::InProgress;
        step.started_at = Some(Timestamp::now());
        let _ = self.events.send(PlanEvent::StepStart(step.clone()));

        let action = if options.dry_run {
            tokio::time::sleep(DRY_RUN_DELAY).await;
            Ok(format!("[DRY RUN] Would execute: {}", step.title))
        } else {
            self.run_step_action(step, workspace_root).await
        };

        match action {
            Ok(output) => {
                step.output = Some(truncate_output(&output));
                step.status = StepStatus::Completed;
                step.completed_at = Some(Timestamp::now());
                let _ = self.events.send(PlanEvent::StepComplete(step.clone()));
            }
            Err(error) => {
                let message = error.to_string();
                step.error = Some(message.clone());
                step.status = StepStatus::Failed;
                step.completed_at = Some(Timestamp::now());
                errors.push(format!("Step {} ({}): {message}", step.id, step.title));
                let _ = self.events.send(PlanEvent::StepFailed {
                    step: step.clone(),
                    error: message,
                });
                return StepOutcome::Failed;
            }
        }

        for substep in &mut step.substeps {
            if handle.is_cancelled() {
                return StepOutcome::Cancelled;
            }
            if handle.skip_requested(&substep.id) && substep.status == StepStatus::Pending {
                substep.status = StepStatus::Skipped;
            }
            if substep.status != StepStatus::Pending {
                continue;
            }
            let outcome = Box::pin(self.run_step_tree(
                substep,
                options,
                handle,
                workspace_root,
                errors,
            ))
            .await;
            if outcome == StepOutcome::Cancelled {
                return StepOutcome::Cancelled;
            }
        }

        StepOutcome::Completed
    }
}

/// Awaits the run signal until it is `Running`. Returns `false` when
/// the run was cancelled instead.
async fn wait_until_running(signal: &mut watch::Receiver<RunSignal>) -> bool {
    loop {
        let current = *signal.borrow_and_update();
        match current {
            RunSignal::Running => return true,
            RunSignal::Cancelled => return false,
            RunSignal::Paused => {
                if signal.changed().await.is_err() {
                    return false;
                }
            }
        }
    }
}

/// Blocks until the step is approved, skipped, or the run is cancelled.
async fn wait_for_gate(
    handle: &ExecutionHandle,
    signal: &mut watch::Receiver<RunSignal>,
    step_id: &str,
) -> GateOutcome {
    loop {
        // Register for wakeups before checking, so a notification
        // between the check and the await is not lost.
        let notified = handle.gate_notified();
        if handle.is_cancelled() {
            return GateOutcome::Cancelled;
        }
        if handle.skip_requested(step_id) {
            return GateOutcome::Skipped;
        }
        if handle.is_approved(step_id) {
            return GateOutcome::Approved;
        }
        tokio::select! {
            _ = notified => {}
            changed = signal.changed() => {
                if changed.is_err() || handle.is_cancelled() {
                    return GateOutcome::Cancelled;
                }
            }
        }
    }
}
