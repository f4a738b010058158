//! Execution options and run results.

use std::time::Duration;

/// Policy knobs for a single execution run. Not persisted.
#[derive(Debug, Clone, Copy)]
pub struct ExecuteOptions {
    /// Start every step without waiting for per-step approval
    pub auto_approve: bool,

    /// Simulate step completion without invoking any delegation
    pub dry_run: bool,

    /// Keep executing subsequent steps after a step failure
    pub continue_on_error: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            auto_approve: false,
            dry_run: false,
            continue_on_error: true,
        }
    }
}

/// Summary returned once per execution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Plan the run belonged to
    pub plan_id: u64,

    /// True only if zero steps failed and the run was not cancelled
    pub success: bool,

    /// Top-level steps that completed successfully
    pub steps_executed: usize,

    /// Top-level steps that failed
    pub steps_failed: usize,

    /// Top-level steps that were skipped
    pub steps_skipped: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Accumulated per-step error strings, in order of occurrence
    pub errors: Vec<String>,
}

impl ExecutionResult {
    /// Result for a run that could not start because the environment is
    /// incomplete (no workspace root). No steps are touched.
    pub fn environment_failure(plan_id: u64, message: impl Into<String>) -> Self {
        Self {
            plan_id,
            success: false,
            steps_executed: 0,
            steps_failed: 0,
            steps_skipped: 0,
            duration: Duration::ZERO,
            errors: vec![message.into()],
        }
    }
}
