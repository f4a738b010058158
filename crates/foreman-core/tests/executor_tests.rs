mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{create_bare_manager, create_test_manager, MockStepExecutor};
use foreman_core::{ExecuteOptions, PlanEvent, PlanStatus, StepStatus};
use tokio::time::timeout;

const PLAN_JSON: &str = r#"```json
{
  "title": "Release prep",
  "steps": [
    {"title": "Gather context", "type": "research"},
    {"title": "Update changelog", "type": "file-edit", "target": "CHANGELOG.md"},
    {"title": "Tidy up", "type": "other"}
  ]
}
```"#;

fn auto_run() -> ExecuteOptions {
    ExecuteOptions {
        auto_approve: true,
        ..Default::default()
    }
}

/// Waits for the next approval request on the event stream.
async fn next_approval(rx: &mut tokio::sync::broadcast::Receiver<PlanEvent>) -> String {
    loop {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for approval event")
            .expect("event channel closed");
        if let PlanEvent::ApprovalRequired(step) = event {
            return step.id;
        }
    }
}

#[tokio::test]
async fn test_execute_plan_runs_all_steps() {
    let executor = MockStepExecutor::new();
    let (_temp, manager) = create_test_manager(executor.clone()).await;

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");
    manager.approve_plan(plan.id).await.expect("Failed to approve");

    let result = manager
        .execute_plan(plan.id, auto_run())
        .await
        .expect("Execution refused");

    assert!(result.success);
    assert_eq!(result.steps_executed, 3);
    assert_eq!(result.steps_failed, 0);
    assert!(result.errors.is_empty());

    let plan = manager.plan(plan.id).expect("Plan missing");
    assert_eq!(plan.status, PlanStatus::Completed);
    assert!(plan.completed_at.is_some());
    assert_eq!(plan.metadata.completed_steps, 3);
    assert!(plan
        .steps
        .iter()
        .all(|s| s.status == StepStatus::Completed));

    // Research and file-edit steps delegate; "other" completes locally.
    let instructions = executor.recorded();
    assert_eq!(instructions.len(), 2);
    assert!(instructions[0].starts_with("Research task: Gather context"));
    assert!(instructions[1].contains("Edit the file at CHANGELOG.md"));
}

#[tokio::test]
async fn test_dry_run_touches_nothing() {
    let executor = MockStepExecutor::new();
    let (_temp, manager) = create_test_manager(executor.clone()).await;

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");

    let options = ExecuteOptions {
        auto_approve: true,
        dry_run: true,
        ..Default::default()
    };
    let result = manager
        .execute_plan(plan.id, options)
        .await
        .expect("Execution refused");

    assert!(result.success);
    assert_eq!(result.steps_executed, 3);
    assert!(executor.recorded().is_empty());

    let plan = manager.plan(plan.id).expect("Plan missing");
    let output = plan.steps[0].output.as_deref().expect("No output");
    assert!(output.starts_with("[DRY RUN]"));
}

#[tokio::test]
async fn test_failed_step_continues_by_default() {
    let executor = MockStepExecutor::failing_on("CHANGELOG.md");
    let (_temp, manager) = create_test_manager(executor.clone()).await;

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");

    let result = manager
        .execute_plan(plan.id, auto_run())
        .await
        .expect("Execution refused");

    assert!(!result.success);
    assert_eq!(result.steps_executed, 2);
    assert_eq!(result.steps_failed, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Step 2 (Update changelog)"));

    let plan = manager.plan(plan.id).expect("Plan missing");
    assert_eq!(plan.status, PlanStatus::Failed);
    assert_eq!(plan.steps[1].status, StepStatus::Failed);
    assert!(plan.steps[1].error.is_some());
    assert_eq!(plan.steps[2].status, StepStatus::Completed);
}

#[tokio::test]
async fn test_stop_on_first_failure() {
    let executor = MockStepExecutor::failing_on("CHANGELOG.md");
    let (_temp, manager) = create_test_manager(executor.clone()).await;

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");

    let options = ExecuteOptions {
        auto_approve: true,
        continue_on_error: false,
        ..Default::default()
    };
    let result = manager
        .execute_plan(plan.id, options)
        .await
        .expect("Execution refused");

    assert!(!result.success);
    assert_eq!(result.steps_executed, 1);
    assert_eq!(result.steps_failed, 1);

    let plan = manager.plan(plan.id).expect("Plan missing");
    assert_eq!(plan.steps[2].status, StepStatus::Pending);
}

#[tokio::test]
async fn test_pre_skipped_step_is_bypassed() {
    let executor = MockStepExecutor::new();
    let (_temp, manager) = create_test_manager(executor.clone()).await;

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");
    assert!(manager.skip_step(plan.id, "2").await);

    let result = manager
        .execute_plan(plan.id, auto_run())
        .await
        .expect("Execution refused");

    assert!(result.success);
    assert_eq!(result.steps_executed, 2);
    assert_eq!(result.steps_skipped, 1);

    let plan = manager.plan(plan.id).expect("Plan missing");
    assert_eq!(plan.steps[1].status, StepStatus::Skipped);
    assert_eq!(plan.metadata.skipped_steps, 1);
    // The skipped file-edit never reached the delegate.
    assert_eq!(executor.recorded().len(), 1);
}

#[tokio::test]
async fn test_approval_gate_blocks_until_approved() {
    let executor = MockStepExecutor::new();
    let (_temp, manager) = create_test_manager(executor).await;
    let manager = Arc::new(manager);

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");
    let plan_id = plan.id;

    let mut rx = manager.subscribe();
    let approver = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            loop {
                let step_id = next_approval(&mut rx).await;
                if step_id == "2" {
                    // Exercise the skip path on the gate itself.
                    assert!(manager.skip_step(plan_id, &step_id).await);
                } else {
                    assert!(manager.approve_step(&step_id));
                }
            }
        })
    };

    let result = manager
        .execute_plan(plan_id, ExecuteOptions::default())
        .await
        .expect("Execution refused");
    approver.abort();

    assert!(result.success);
    assert_eq!(result.steps_executed, 2);
    assert_eq!(result.steps_skipped, 1);

    let plan = manager.plan(plan_id).expect("Plan missing");
    assert_eq!(plan.status, PlanStatus::Completed);
    assert_eq!(plan.steps[1].status, StepStatus::Skipped);
}

#[tokio::test]
async fn test_cancel_at_approval_gate() {
    let executor = MockStepExecutor::new();
    let (_temp, manager) = create_test_manager(executor.clone()).await;
    let manager = Arc::new(manager);

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");
    let plan_id = plan.id;

    let mut rx = manager.subscribe();
    let canceller = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            let _ = next_approval(&mut rx).await;
            assert!(manager.cancel_execution());
        })
    };

    let result = manager
        .execute_plan(plan_id, ExecuteOptions::default())
        .await
        .expect("Execution refused");
    canceller.await.expect("Canceller panicked");

    assert!(!result.success);
    assert_eq!(result.steps_executed, 0);
    assert!(executor.recorded().is_empty());

    let plan = manager.plan(plan_id).expect("Plan missing");
    assert_eq!(plan.status, PlanStatus::Cancelled);
    assert_eq!(plan.steps[0].status, StepStatus::Pending);
}

#[tokio::test]
async fn test_pause_holds_at_the_next_step_boundary() {
    let executor = MockStepExecutor::new();
    let (_temp, manager) = create_test_manager(executor).await;
    let manager = Arc::new(manager);

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");
    let plan_id = plan.id;

    let mut rx = manager.subscribe();
    let runner = {
        let manager = Arc::clone(&manager);
        tokio::spawn(
            async move { manager.execute_plan(plan_id, ExecuteOptions::default()).await },
        )
    };

    let first = next_approval(&mut rx).await;
    assert_eq!(first, "1");
    // Pause before approving; step 1 still runs, but the loop must hold
    // before reaching step 2's approval gate.
    assert!(manager.pause_execution());
    assert!(manager.approve_step(&first));

    let held = timeout(Duration::from_millis(200), next_approval(&mut rx)).await;
    assert!(held.is_err(), "step 2 was gated while paused");

    assert!(manager.resume_execution());
    let second = next_approval(&mut rx).await;
    assert_eq!(second, "2");
    assert!(manager.approve_step(&second));
    let third = next_approval(&mut rx).await;
    assert!(manager.approve_step(&third));

    let result = runner
        .await
        .expect("Runner panicked")
        .expect("Execution refused");
    assert!(result.success);
    assert_eq!(result.steps_executed, 3);
}

#[tokio::test]
async fn test_second_execute_refused_while_running() {
    let executor = MockStepExecutor::new();
    let (_temp, manager) = create_test_manager(executor).await;
    let manager = Arc::new(manager);

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");
    let plan_id = plan.id;

    let mut rx = manager.subscribe();
    let runner = {
        let manager = Arc::clone(&manager);
        tokio::spawn(
            async move { manager.execute_plan(plan_id, ExecuteOptions::default()).await },
        )
    };

    // The run is holding at the first approval gate.
    let _ = next_approval(&mut rx).await;
    assert!(manager.execute_plan(plan_id, auto_run()).await.is_none());
    assert!(!manager.delete_plan(plan_id).await);

    assert!(manager.cancel_execution());
    let result = runner
        .await
        .expect("Runner panicked")
        .expect("Execution refused");
    assert!(!result.success);
}

#[tokio::test]
async fn test_substep_failure_does_not_fail_parent() {
    let executor = MockStepExecutor::failing_on("flaky");
    let (_temp, manager) = create_test_manager(executor.clone()).await;

    let text = r#"```json
{
  "title": "Nested work",
  "steps": [
    {
      "title": "Parent task",
      "type": "other",
      "substeps": [
        {"title": "Research the stable part", "type": "research"},
        {"title": "Research the flaky part", "type": "research"}
      ]
    }
  ]
}
```"#;
    let plan = manager
        .create_plan_from_text(text)
        .await
        .expect("Failed to parse plan");

    let result = manager
        .execute_plan(plan.id, auto_run())
        .await
        .expect("Execution refused");

    // Top-level counters only; the substep failure surfaces in errors.
    assert!(result.success);
    assert_eq!(result.steps_executed, 1);
    assert_eq!(result.steps_failed, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Step 1.2"));

    let plan = manager.plan(plan.id).expect("Plan missing");
    assert_eq!(plan.status, PlanStatus::Completed);
    assert_eq!(plan.steps[0].status, StepStatus::Completed);
    assert_eq!(plan.steps[0].substeps[0].status, StepStatus::Completed);
    assert_eq!(plan.steps[0].substeps[1].status, StepStatus::Failed);
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_step_captures_output() {
    let executor = MockStepExecutor::new();
    let (_temp, manager) = create_test_manager(executor.clone()).await;

    let text = r#"```json
{
  "title": "Shell check",
  "steps": [
    {"title": "Say hello", "type": "command", "target": "echo hello"}
  ]
}
```"#;
    let plan = manager
        .create_plan_from_text(text)
        .await
        .expect("Failed to parse plan");

    let result = manager
        .execute_plan(plan.id, auto_run())
        .await
        .expect("Execution refused");
    assert!(result.success);

    let plan = manager.plan(plan.id).expect("Plan missing");
    assert_eq!(plan.steps[0].output.as_deref(), Some("hello"));
    // Command steps run through the shell, never the delegate.
    assert!(executor.recorded().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_command_reports_stderr() {
    let executor = MockStepExecutor::new();
    let (_temp, manager) = create_test_manager(executor).await;

    let text = r#"```json
{
  "title": "Shell check",
  "steps": [
    {"title": "Fail loudly", "type": "command", "target": "echo nope >&2; exit 3"}
  ]
}
```"#;
    let plan = manager
        .create_plan_from_text(text)
        .await
        .expect("Failed to parse plan");

    let result = manager
        .execute_plan(plan.id, auto_run())
        .await
        .expect("Execution refused");

    assert!(!result.success);
    assert_eq!(result.steps_failed, 1);
    let plan = manager.plan(plan.id).expect("Plan missing");
    let error = plan.steps[0].error.as_deref().expect("No error recorded");
    assert!(error.contains("nope"));
}

#[tokio::test]
async fn test_execute_without_workspace_root_fails_cleanly() {
    let (_temp, manager) = create_bare_manager().await;

    let plan = manager
        .create_plan_from_text(PLAN_JSON)
        .await
        .expect("Failed to parse plan");

    let result = manager
        .execute_plan(plan.id, auto_run())
        .await
        .expect("Expected an environment failure result");

    assert!(!result.success);
    assert_eq!(result.steps_executed, 0);
    assert!(result.errors[0].contains("workspace root"));

    // The plan's lifecycle state is untouched.
    let plan = manager.plan(plan.id).expect("Plan missing");
    assert_eq!(plan.status, PlanStatus::Draft);
}
