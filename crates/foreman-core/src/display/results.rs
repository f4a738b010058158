//! Result wrapper for displaying execution outcomes.

use std::fmt;

use crate::models::ExecutionResult;

/// Wrapper rendering an [`ExecutionResult`] as a short markdown report:
/// outcome line, step counters, elapsed time, and any step errors.
pub struct ExecutionReport(pub ExecutionResult);

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.0;
        let outcome = if result.success {
            "completed"
        } else {
            "failed"
        };
        writeln!(f, "Execution of plan {} {outcome}", result.plan_id)?;
        writeln!(f)?;
        writeln!(f, "- Steps executed: {}", result.steps_executed)?;
        writeln!(f, "- Steps failed: {}", result.steps_failed)?;
        writeln!(f, "- Steps skipped: {}", result.steps_skipped)?;
        writeln!(f, "- Duration: {:.1}s", result.duration.as_secs_f64())?;

        if !result.errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Errors:")?;
            for error in &result.errors {
                writeln!(f, "- {error}")?;
            }
        }
        Ok(())
    }
}
